use std::{
    any::TypeId,
    collections::{BTreeMap, BTreeSet, VecDeque},
    rc::Rc,
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{
    component::Component,
    component_type_registry::{ComponentTypeId, ComponentTypeRegistry},
    entity_builder::EntityBuilder,
    multi_type_component_storage::MultiTypeComponentStorage,
    signature::{Signature, MAX_COMPONENT_COUNT},
    system::System,
    system_container::SystemContainer,
};

pub const MAX_ENTITY_COUNT: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default-constructs one component kind and attaches it to an entity.
pub type ComponentCreator = Rc<dyn Fn(&mut EntityContainer, EntityId)>;

/// Reads one component kind of an entity without compile-time knowledge of
/// the concrete type.
pub type ComponentAccessor =
    Rc<dyn for<'a> Fn(&'a EntityContainer, EntityId) -> Option<&'a dyn Component>>;

/// Root coordinator of the entity/component runtime: id allocation, signature
/// bookkeeping, per-kind storage dispatch and system membership updates.
///
/// All mutation goes through `&mut self` on one logical thread; background
/// work reads snapshots produced by `serialize_entity` and hands its results
/// back to the owning thread.
pub struct EntityContainer {
    pub(crate) types: ComponentTypeRegistry,
    pub(crate) available_entities: VecDeque<EntityId>,
    pub(crate) signatures: BTreeMap<EntityId, Signature>,
    pub(crate) component_storages: MultiTypeComponentStorage,
    pub(crate) systems: SystemContainer,
    pub(crate) component_creators: BTreeMap<ComponentTypeId, ComponentCreator>,
    pub(crate) component_accessors: BTreeMap<ComponentTypeId, ComponentAccessor>,
}

impl Default for EntityContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityContainer {
    pub fn new() -> Self {
        Self {
            types: ComponentTypeRegistry::new(),
            available_entities: (0..MAX_ENTITY_COUNT).map(EntityId).collect(),
            signatures: BTreeMap::new(),
            component_storages: MultiTypeComponentStorage::new(),
            systems: SystemContainer::new(),
            component_creators: BTreeMap::new(),
            component_accessors: BTreeMap::new(),
        }
    }

    pub fn add_new_entity(&mut self) -> EntityId {
        let entity_id = match self.available_entities.pop_front() {
            Some(entity_id) => entity_id,
            None => panic!("entity capacity reached"),
        };
        self.signatures.insert(entity_id, Signature::default());
        entity_id
    }

    pub fn entity_builder(&mut self) -> EntityBuilder<'_> {
        EntityBuilder::new(self)
    }

    pub fn destroy_entity(&mut self, entity_id: EntityId) -> bool {
        assert!(
            entity_id.0 < MAX_ENTITY_COUNT,
            "entity id {entity_id} is out of range"
        );

        if self.signatures.remove(&entity_id).is_none() {
            return false;
        }

        self.component_storages.erase_entity(entity_id);
        self.systems.drop_entity(&entity_id);
        self.available_entities.push_back(entity_id);
        true
    }

    pub fn destroy_all_entities(&mut self) {
        let entity_ids: Vec<EntityId> = self.signatures.keys().copied().collect();
        for entity_id in entity_ids {
            self.destroy_entity(entity_id);
        }
    }

    pub fn contains_entity(&self, entity_id: EntityId) -> bool {
        self.signatures.contains_key(&entity_id)
    }

    pub fn entity_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn iter_entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.signatures.keys().copied()
    }

    pub fn signature_of(&self, entity_id: EntityId) -> Option<Signature> {
        self.signatures.get(&entity_id).copied()
    }

    pub fn component_types(&self) -> &ComponentTypeRegistry {
        &self.types
    }

    pub fn component_types_mut(&mut self) -> &mut ComponentTypeRegistry {
        &mut self.types
    }

    pub fn add_component<T: Component>(&mut self, entity_id: EntityId, component: T) -> &mut T {
        assert!(
            entity_id.0 < MAX_ENTITY_COUNT,
            "entity id {entity_id} is out of range"
        );

        let type_id = self.types.kind_id::<T>();
        let signature_mut = match self.signatures.get_mut(&entity_id) {
            Some(signature_mut) => signature_mut,
            None => panic!("no signature recorded for entity {entity_id}"),
        };

        if signature_mut.contains(type_id) {
            log::warn!(
                "entity {entity_id} already has a component of this kind, keeping the existing one"
            );
        } else {
            assert!(
                signature_mut.len() < MAX_COMPONENT_COUNT,
                "component capacity reached for entity {entity_id}"
            );
            signature_mut.insert(type_id);
            let signature = *signature_mut;

            self.component_storages
                .storage_mut_for::<T>(type_id)
                .insert(entity_id, component);
            self.systems.refresh_entity(entity_id, signature);
        }

        match self
            .component_storages
            .storage_mut_for::<T>(type_id)
            .get_mut(entity_id)
        {
            Some(component_mut) => component_mut,
            None => unreachable!(),
        }
    }

    pub fn remove_component<T: Component>(&mut self, entity_id: EntityId) {
        assert!(
            entity_id.0 < MAX_ENTITY_COUNT,
            "entity id {entity_id} is out of range"
        );

        let Some(type_id) = self.types.id_of::<T>() else {
            return;
        };
        let Some(signature_mut) = self.signatures.get_mut(&entity_id) else {
            return;
        };
        if !signature_mut.contains(type_id) {
            return;
        }

        signature_mut.remove(type_id);
        let signature = *signature_mut;

        self.component_storages.erase(type_id, entity_id);
        self.systems.refresh_entity(entity_id, signature);
    }

    pub fn has_component<T: Component>(&self, entity_id: EntityId) -> bool {
        let Some(type_id) = self.types.id_of::<T>() else {
            return false;
        };
        self.signatures
            .get(&entity_id)
            .map(|signature| signature.contains(type_id))
            .unwrap_or(false)
    }

    /// Precondition: `has_component::<T>(entity_id)`.
    pub fn get_component<T: Component>(&self, entity_id: EntityId) -> &T {
        let component_opt = self
            .types
            .id_of::<T>()
            .and_then(|type_id| self.component_storages.storage_ref_for::<T>(type_id))
            .and_then(|storage| storage.get(entity_id));

        match component_opt {
            Some(component) => component,
            None => panic!("entity {entity_id} has no component of the requested kind"),
        }
    }

    /// Precondition: `has_component::<T>(entity_id)`.
    pub fn get_component_mut<T: Component>(&mut self, entity_id: EntityId) -> &mut T {
        let component_opt = self
            .types
            .id_of::<T>()
            .and_then(|type_id| self.component_storages.get_any_mut(type_id, entity_id))
            .and_then(|component| component.as_any_mut().downcast_mut::<T>());

        match component_opt {
            Some(component) => component,
            None => panic!("entity {entity_id} has no component of the requested kind"),
        }
    }

    /// Registers the kind under a stable display name and binds the creator
    /// and accessor closures that drive serialization and the dynamic
    /// registration boundary. On a name collision the first registration
    /// keeps both the id and the closures.
    pub fn register_component_name<T: Component + Default>(
        &mut self,
        name: &str,
    ) -> ComponentTypeId {
        let type_id = self.types.register::<T>(name);

        if self.types.id_of::<T>() == Some(type_id) {
            let creator: ComponentCreator =
                Rc::new(|container: &mut EntityContainer, entity_id: EntityId| {
                    container.add_component(entity_id, T::default());
                });
            self.component_creators.entry(type_id).or_insert(creator);

            let accessor: ComponentAccessor =
                Rc::new(move |container: &EntityContainer, entity_id: EntityId| {
                    container.component_storages.get_any(type_id, entity_id)
                });
            self.component_accessors.entry(type_id).or_insert(accessor);
        }

        type_id
    }

    pub fn add_component_by_name(&mut self, name: &str, entity_id: EntityId) -> bool {
        let Some(type_id) = self.types.id_of_name(name) else {
            log::warn!("no component kind registered under the name {name:?}");
            return false;
        };
        let Some(creator) = self.component_creators.get(&type_id).cloned() else {
            log::warn!("component kind {name:?} has no registered creator");
            return false;
        };

        creator(self, entity_id);
        true
    }

    pub fn registered_component_names(&self) -> Vec<String> {
        self.types.registered_names()
    }

    pub fn register_system<S: System>(&mut self, system: S) -> Arc<RwLock<S>> {
        let system_type_id = TypeId::of::<S>();
        assert!(
            !self.systems.contains(&system_type_id),
            "system already registered"
        );

        let required_signature = system.required_signature(&mut self.types);
        let entities: BTreeSet<EntityId> = self
            .signatures
            .iter()
            .filter(|(_, signature)| signature.is_superset_of(&required_signature))
            .map(|(entity_id, _)| *entity_id)
            .collect();

        let system = Arc::new(RwLock::new(system));
        self.systems
            .insert::<S>(system.clone(), required_signature, entities.clone());
        system.write().start(self, &entities);

        system
    }

    pub fn unregister_system<S: System>(&mut self) -> bool {
        match self.systems.remove(&TypeId::of::<S>()) {
            Some(entry) => {
                entry.system.write().destroy();
                true
            }
            None => false,
        }
    }

    pub fn get_system<S: System>(&self) -> Option<Arc<RwLock<S>>> {
        self.systems.get::<S>()
    }

    pub fn entities_of_system<S: System>(&self) -> Option<&BTreeSet<EntityId>> {
        self.systems.entities_of::<S>()
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Drives every registered system once. Each system sees the membership
    /// snapshot taken at the start of its own call.
    pub fn update(&mut self, delta_time_in_secs: f32) {
        for (system, entities) in self.systems.update_batch() {
            system.write().update(self, &entities, delta_time_in_secs);
        }
    }

    /// Full teardown; process and test boundaries only. Every outstanding
    /// entity id, type id and system handle is invalidated.
    pub fn reset(&mut self) {
        self.systems.clear();
        self.component_storages.clear();
        self.signatures.clear();
        self.component_creators.clear();
        self.component_accessors.clear();
        self.types.reset();
        self.available_entities = (0..MAX_ENTITY_COUNT).map(EntityId).collect();
    }
}
