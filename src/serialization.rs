use serde_json::{Map, Value};

use crate::{
    component::Document,
    entity_container::{EntityContainer, EntityId},
};

#[derive(Debug)]
pub enum SerializationError {
    UnknownEntity(EntityId),
    MissingComponentList,
}

impl EntityContainer {
    /// Snapshot of one entity's full component set:
    /// `{ "ID": <id>, "components": [ { "<Name>": { ... } }, ... ] }`.
    ///
    /// Only kinds registered through `register_component_name` contribute a
    /// block; a signature entry without an accessor has no stable name to
    /// serialize under and is skipped.
    pub fn serialize_entity(&self, entity_id: EntityId) -> Result<Document, SerializationError> {
        let signature = self
            .signature_of(entity_id)
            .ok_or(SerializationError::UnknownEntity(entity_id))?;

        let mut components = Vec::new();
        for type_id in signature.iter() {
            let name = self.types.name_of(type_id);
            let Some(accessor) = self.component_accessors.get(&type_id) else {
                log::warn!("component kind {name:?} has no registered accessor, skipping it");
                continue;
            };

            match accessor(self, entity_id) {
                Some(component) => {
                    let mut block = Map::new();
                    block.insert(name.to_string(), component.to_document());
                    components.push(Value::Object(block));
                }
                None => log::warn!(
                    "signature of entity {entity_id} lists {name:?} but its storage holds no instance"
                ),
            }
        }

        let mut document = Map::new();
        document.insert("ID".to_string(), Value::from(entity_id.index()));
        document.insert("components".to_string(), Value::Array(components));
        Ok(Value::Object(document))
    }

    /// Creates a new entity from a document produced by `serialize_entity`.
    /// A document without a component list is rejected before any entity is
    /// allocated.
    pub fn deserialize_entity(&mut self, document: &Document) -> Result<EntityId, SerializationError> {
        let blocks = Self::component_blocks(document)?;
        let entity_id = self.add_new_entity();
        self.apply_component_blocks(entity_id, blocks);
        Ok(entity_id)
    }

    /// Overwrite form: applies the document onto an existing entity.
    /// Components the entity already has are updated in place.
    pub fn deserialize_entity_into(
        &mut self,
        entity_id: EntityId,
        document: &Document,
    ) -> Result<(), SerializationError> {
        let blocks = Self::component_blocks(document)?;
        if !self.contains_entity(entity_id) {
            return Err(SerializationError::UnknownEntity(entity_id));
        }
        self.apply_component_blocks(entity_id, blocks);
        Ok(())
    }

    fn component_blocks(document: &Document) -> Result<&Vec<Value>, SerializationError> {
        document
            .get("components")
            .and_then(Value::as_array)
            .ok_or(SerializationError::MissingComponentList)
    }

    fn apply_component_blocks(&mut self, entity_id: EntityId, blocks: &[Value]) {
        for block in blocks {
            let Some(entries) = block.as_object() else {
                log::warn!("component entry for entity {entity_id} is not an object, skipping it");
                continue;
            };

            for (name, fields) in entries {
                let Some(type_id) = self.types.id_of_name(name) else {
                    log::warn!("unknown component name {name:?}, skipping it");
                    continue;
                };
                let Some(creator) = self.component_creators.get(&type_id).cloned() else {
                    log::warn!("component kind {name:?} has no registered creator, skipping it");
                    continue;
                };

                creator(self, entity_id);
                match self.component_storages.get_any_mut(type_id, entity_id) {
                    Some(component) => component.apply_document(fields),
                    None => {
                        log::warn!("could not attach component {name:?} to entity {entity_id}")
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
    struct PositionComponent {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
    #[serde(default)]
    struct VelocityComponent {
        dx: f32,
        dy: f32,
    }

    fn registered_container() -> EntityContainer {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut container = EntityContainer::new();
        container.register_component_name::<PositionComponent>("Position");
        container.register_component_name::<VelocityComponent>("Velocity");
        container
    }

    #[test]
    fn serialized_document_has_expected_shape() {
        let mut container = registered_container();

        let entity_id = container.add_new_entity();
        container.add_component(entity_id, PositionComponent { x: 1.0, y: 2.0 });
        container.add_component(entity_id, VelocityComponent { dx: 0.0, dy: 1.0 });

        let document = container.serialize_entity(entity_id).unwrap();

        assert_eq!(Some(entity_id.index() as u64), document["ID"].as_u64());
        let blocks = document["components"].as_array().unwrap();
        assert_eq!(2, blocks.len());
        assert_eq!(json!({ "x": 1.0, "y": 2.0 }), blocks[0]["Position"]);
        assert_eq!(json!({ "dx": 0.0, "dy": 1.0 }), blocks[1]["Velocity"]);
    }

    #[test]
    fn serialize_unknown_entity_fails() {
        let container = registered_container();
        assert!(matches!(
            container.serialize_entity(EntityId(7)),
            Err(SerializationError::UnknownEntity(_))
        ));
    }

    #[test]
    fn round_trip_restores_signature_and_values() {
        let mut container = registered_container();

        let entity_id = container.add_new_entity();
        container.add_component(entity_id, PositionComponent { x: 4.0, y: -1.5 });
        container.add_component(entity_id, VelocityComponent { dx: 0.25, dy: 8.0 });

        let document = container.serialize_entity(entity_id).unwrap();
        let restored_id = container.deserialize_entity(&document).unwrap();

        assert_ne!(entity_id, restored_id);
        assert_eq!(
            container.signature_of(entity_id),
            container.signature_of(restored_id)
        );
        assert_eq!(
            container.get_component::<PositionComponent>(entity_id),
            container.get_component::<PositionComponent>(restored_id)
        );
        assert_eq!(
            container.get_component::<VelocityComponent>(entity_id),
            container.get_component::<VelocityComponent>(restored_id)
        );
    }

    #[test]
    fn document_without_component_list_is_rejected() {
        let mut container = registered_container();
        let entity_count = container.entity_count();

        let result = container.deserialize_entity(&json!({ "ID": 12 }));

        assert!(matches!(
            result,
            Err(SerializationError::MissingComponentList)
        ));
        // no entity was created
        assert_eq!(entity_count, container.entity_count());
    }

    #[test]
    fn unknown_component_names_are_skipped() {
        let mut container = registered_container();

        let document = json!({
            "ID": 0,
            "components": [
                { "Position": { "x": 3.0, "y": 4.0 } },
                { "PluginProvidedKind": { "anything": true } },
            ],
        });

        let entity_id = container.deserialize_entity(&document).unwrap();
        assert!(container.has_component::<PositionComponent>(entity_id));
        assert_eq!(1, container.signature_of(entity_id).unwrap().len());
    }

    #[test]
    fn malformed_component_block_degrades_to_defaults() {
        let mut container = registered_container();

        let document = json!({
            "ID": 0,
            "components": [
                // dx has the wrong type; the whole block fails to parse and
                // the freshly attached default instance is kept
                { "Velocity": { "dx": "fast", "dy": 2.0 } },
            ],
        });

        let entity_id = container.deserialize_entity(&document).unwrap();
        assert_eq!(
            VelocityComponent::default(),
            *container.get_component::<VelocityComponent>(entity_id)
        );
    }

    #[test]
    fn partial_component_block_keeps_defaults_for_missing_fields() {
        let mut container = registered_container();

        let document = json!({
            "ID": 0,
            "components": [
                { "Velocity": { "dy": 2.5 } },
            ],
        });

        let entity_id = container.deserialize_entity(&document).unwrap();
        assert_eq!(
            VelocityComponent { dx: 0.0, dy: 2.5 },
            *container.get_component::<VelocityComponent>(entity_id)
        );
    }

    #[test]
    fn deserialize_into_overwrites_existing_components() {
        let mut container = registered_container();

        let entity_id = container.add_new_entity();
        container.add_component(entity_id, PositionComponent { x: 1.0, y: 1.0 });

        let document = json!({
            "ID": entity_id.index(),
            "components": [
                { "Position": { "x": -3.0, "y": 6.0 } },
                { "Velocity": { "dx": 1.0, "dy": 0.0 } },
            ],
        });

        container.deserialize_entity_into(entity_id, &document).unwrap();

        assert_eq!(
            PositionComponent { x: -3.0, y: 6.0 },
            *container.get_component::<PositionComponent>(entity_id)
        );
        assert_eq!(
            VelocityComponent { dx: 1.0, dy: 0.0 },
            *container.get_component::<VelocityComponent>(entity_id)
        );
    }

    #[test]
    fn deserialize_into_unknown_entity_fails() {
        let mut container = registered_container();
        let document = json!({ "ID": 3, "components": [] });

        assert!(matches!(
            container.deserialize_entity_into(EntityId(3), &document),
            Err(SerializationError::UnknownEntity(_))
        ));
    }
}
