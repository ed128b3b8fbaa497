use std::collections::BTreeMap;

use crate::{
    component::Component,
    component_storage::{AnyComponentStorage, ComponentStorage},
    component_type_registry::ComponentTypeId,
    entity_container::EntityId,
};

pub(crate) struct MultiTypeComponentStorage {
    storages: BTreeMap<ComponentTypeId, Box<dyn AnyComponentStorage>>,
}

impl Default for MultiTypeComponentStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiTypeComponentStorage {
    pub fn new() -> Self {
        Self {
            storages: BTreeMap::new(),
        }
    }

    pub fn storage_mut_for<T: Component>(
        &mut self,
        type_id: ComponentTypeId,
    ) -> &mut ComponentStorage<T> {
        match self
            .storages
            .entry(type_id)
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
        {
            Some(storage) => storage,
            None => unreachable!(),
        }
    }

    pub fn storage_ref_for<T: Component>(
        &self,
        type_id: ComponentTypeId,
    ) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&type_id)?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    pub fn get_any(&self, type_id: ComponentTypeId, entity_id: EntityId) -> Option<&dyn Component> {
        self.storages.get(&type_id)?.get_any(entity_id)
    }

    pub fn get_any_mut(
        &mut self,
        type_id: ComponentTypeId,
        entity_id: EntityId,
    ) -> Option<&mut dyn Component> {
        self.storages.get_mut(&type_id)?.get_any_mut(entity_id)
    }

    pub fn erase(&mut self, type_id: ComponentTypeId, entity_id: EntityId) {
        if let Some(storage) = self.storages.get_mut(&type_id) {
            storage.erase(entity_id);
        }
    }

    /// Unconditional sweep over every storage; entity destruction must not
    /// rely on the signature to know which kinds are present.
    pub fn erase_entity(&mut self, entity_id: EntityId) {
        for storage in self.storages.values_mut() {
            storage.erase(entity_id);
        }
    }

    pub fn clear(&mut self) {
        self.storages.clear();
    }
}
