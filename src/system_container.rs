use std::{
    any::{Any, TypeId},
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{entity_container::EntityId, signature::Signature, system::System};

pub(crate) struct SystemEntry {
    pub(crate) required_signature: Signature,
    pub(crate) entities: BTreeSet<EntityId>,
    pub(crate) system: Arc<RwLock<dyn System>>,
    concrete_system: Arc<dyn Any + Send + Sync>,
}

pub(crate) struct SystemContainer {
    systems: HashMap<TypeId, SystemEntry>,
}

impl Default for SystemContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemContainer {
    pub fn new() -> Self {
        Self {
            systems: HashMap::new(),
        }
    }

    pub fn contains(&self, system_type_id: &TypeId) -> bool {
        self.systems.contains_key(system_type_id)
    }

    pub fn insert<S: System>(
        &mut self,
        system: Arc<RwLock<S>>,
        required_signature: Signature,
        entities: BTreeSet<EntityId>,
    ) {
        let entry = SystemEntry {
            required_signature,
            entities,
            system: system.clone(),
            concrete_system: system,
        };
        self.systems.insert(TypeId::of::<S>(), entry);
    }

    pub fn remove(&mut self, system_type_id: &TypeId) -> Option<SystemEntry> {
        self.systems.remove(system_type_id)
    }

    pub fn get<S: System>(&self) -> Option<Arc<RwLock<S>>> {
        let entry = self.systems.get(&TypeId::of::<S>())?;
        entry.concrete_system.clone().downcast::<RwLock<S>>().ok()
    }

    pub fn entities_of<S: System>(&self) -> Option<&BTreeSet<EntityId>> {
        self.systems
            .get(&TypeId::of::<S>())
            .map(|entry| &entry.entities)
    }

    pub fn refresh_entity(&mut self, entity_id: EntityId, signature: Signature) {
        for entry in self.systems.values_mut() {
            if signature.is_superset_of(&entry.required_signature) {
                entry.entities.insert(entity_id);
            } else {
                entry.entities.remove(&entity_id);
            }
        }
    }

    pub fn drop_entity(&mut self, entity_id: &EntityId) {
        for entry in self.systems.values_mut() {
            entry.entities.remove(entity_id);
        }
    }

    /// Handles plus membership snapshots for one driving pass; membership
    /// changes made by a system take effect in the entries, not in the
    /// snapshots already handed out.
    pub fn update_batch(&self) -> Vec<(Arc<RwLock<dyn System>>, BTreeSet<EntityId>)> {
        self.systems
            .values()
            .map(|entry| (entry.system.clone(), entry.entities.clone()))
            .collect()
    }

    pub fn clear(&mut self) {
        for entry in self.systems.values() {
            entry.system.write().destroy();
        }
        self.systems.clear();
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }
}
