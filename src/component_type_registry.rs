use std::{any::TypeId, collections::HashMap};

use crate::signature::MAX_COMPONENT_COUNT;

pub const UNKNOWN_COMPONENT_NAME: &str = "Unknown";

/// Dense identity of one component kind, stable for the registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentTypeId(pub(crate) usize);

impl ComponentTypeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

pub struct ComponentTypeRegistry {
    ids_by_kind: HashMap<TypeId, ComponentTypeId>,
    ids_by_name: HashMap<String, ComponentTypeId>,
    primary_names: HashMap<ComponentTypeId, String>,
    next_id: usize,
}

impl Default for ComponentTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTypeRegistry {
    pub fn new() -> Self {
        Self {
            ids_by_kind: HashMap::new(),
            ids_by_name: HashMap::new(),
            primary_names: HashMap::new(),
            next_id: 0,
        }
    }

    /// Id of a concrete kind, allocating a nameless id the first time the
    /// kind is seen. No name is recorded here; `name_of` reports
    /// `UNKNOWN_COMPONENT_NAME` until `register` binds one.
    pub fn kind_id<T: 'static>(&mut self) -> ComponentTypeId {
        self.id_of_kind_or_allocate(TypeId::of::<T>())
    }

    pub(crate) fn id_of_kind_or_allocate(&mut self, kind: TypeId) -> ComponentTypeId {
        if let Some(type_id) = self.ids_by_kind.get(&kind) {
            return *type_id;
        }

        assert!(
            self.next_id < MAX_COMPONENT_COUNT,
            "component type space exhausted"
        );
        let type_id = ComponentTypeId(self.next_id);
        self.next_id += 1;
        self.ids_by_kind.insert(kind, type_id);
        type_id
    }

    pub fn register<T: 'static>(&mut self, name: &str) -> ComponentTypeId {
        self.register_kind(TypeId::of::<T>(), name)
    }

    /// Idempotent; a name that already belongs to another kind keeps its
    /// first registration and the existing id is returned.
    pub fn register_kind(&mut self, kind: TypeId, name: &str) -> ComponentTypeId {
        if let Some(name_id) = self.ids_by_name.get(name).copied() {
            if self.ids_by_kind.get(&kind) != Some(&name_id) {
                log::warn!(
                    "component name {name:?} already belongs to another kind, reusing its id"
                );
            }
            return name_id;
        }

        let type_id = self.id_of_kind_or_allocate(kind);
        self.ids_by_name.insert(name.to_string(), type_id);
        self.primary_names
            .entry(type_id)
            .or_insert_with(|| name.to_string());
        type_id
    }

    pub fn id_of<T: 'static>(&self) -> Option<ComponentTypeId> {
        self.id_of_kind(&TypeId::of::<T>())
    }

    pub fn id_of_kind(&self, kind: &TypeId) -> Option<ComponentTypeId> {
        self.ids_by_kind.get(kind).copied()
    }

    pub fn id_of_name(&self, name: &str) -> Option<ComponentTypeId> {
        self.ids_by_name.get(name).copied()
    }

    pub fn name_of(&self, type_id: ComponentTypeId) -> &str {
        self.primary_names
            .get(&type_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COMPONENT_NAME)
    }

    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ids_by_name.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn type_count(&self) -> usize {
        self.next_id
    }

    /// Invalidates every id handed out so far; test isolation and full
    /// teardown only.
    pub fn reset(&mut self) {
        self.ids_by_kind.clear();
        self.ids_by_name.clear();
        self.primary_names.clear();
        self.next_id = 0;
    }
}
