use std::{any::Any, collections::BTreeSet};

use crate::{
    component_type_registry::ComponentTypeRegistry,
    entity_container::{EntityContainer, EntityId},
    signature::Signature,
};

/// A stateful subscriber over the entities whose signature covers its
/// required one. The container keeps the tracked entity set consistent after
/// every signature change; the hooks below are driven from the outside.
pub trait System: Any + Send + Sync {
    /// Called once, at registration. The `component_signature!` macro is the
    /// usual way to build the result.
    fn required_signature(&self, types: &mut ComponentTypeRegistry) -> Signature;

    fn start(&mut self, _container: &mut EntityContainer, _entities: &BTreeSet<EntityId>) {}

    fn update(
        &mut self,
        _container: &mut EntityContainer,
        _entities: &BTreeSet<EntityId>,
        _delta_time_in_secs: f32,
    ) {
    }

    fn destroy(&mut self) {}
}
