use std::{any::Any, collections::HashMap};

use slotmap::{DefaultKey, SlotMap};

use crate::{component::Component, entity_container::EntityId};

/// All instances of one component kind, keyed by entity.
///
/// Instances live in a generation-checked slot map: a slot key stays valid
/// across inserts and across erasure of other entities, so lookups for one
/// entity are never invalidated by unrelated mutations of the same storage.
pub struct ComponentStorage<T> {
    slots: SlotMap<DefaultKey, (EntityId, T)>,
    keys_by_entity: HashMap<EntityId, DefaultKey>,
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage<T> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::new(),
            keys_by_entity: HashMap::new(),
        }
    }

    pub fn insert(&mut self, entity_id: EntityId, component: T) -> DefaultKey {
        if let Some(key) = self.keys_by_entity.get(&entity_id) {
            log::warn!(
                "entity {entity_id} already has a component of this kind, keeping the existing one"
            );
            return *key;
        }

        let key = self.slots.insert((entity_id, component));
        self.keys_by_entity.insert(entity_id, key);
        key
    }

    pub fn get(&self, entity_id: EntityId) -> Option<&T> {
        let key = self.keys_by_entity.get(&entity_id)?;
        self.slots.get(*key).map(|(_, component)| component)
    }

    pub fn get_mut(&mut self, entity_id: EntityId) -> Option<&mut T> {
        let key = self.keys_by_entity.get(&entity_id)?;
        self.slots.get_mut(*key).map(|(_, component)| component)
    }

    pub fn contains(&self, entity_id: EntityId) -> bool {
        self.keys_by_entity.contains_key(&entity_id)
    }

    pub fn key_of(&self, entity_id: EntityId) -> Option<DefaultKey> {
        self.keys_by_entity.get(&entity_id).copied()
    }
}

/// Type-erased face of `ComponentStorage`, the shape the storage map and the
/// entity destruction sweep work against.
pub trait AnyComponentStorage {
    fn erase(&mut self, entity_id: EntityId);
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn get_any(&self, entity_id: EntityId) -> Option<&dyn Component>;
    fn get_any_mut(&mut self, entity_id: EntityId) -> Option<&mut dyn Component>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyComponentStorage for ComponentStorage<T> {
    fn erase(&mut self, entity_id: EntityId) {
        if let Some(key) = self.keys_by_entity.remove(&entity_id) {
            self.slots.remove(key);
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.keys_by_entity.clear();
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn get_any(&self, entity_id: EntityId) -> Option<&dyn Component> {
        self.get(entity_id)
            .map(|component| component as &dyn Component)
    }

    fn get_any_mut(&mut self, entity_id: EntityId) -> Option<&mut dyn Component> {
        self.get_mut(entity_id)
            .map(|component| component as &mut dyn Component)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
