use crate::{
    component::Component,
    entity_container::{EntityContainer, EntityId},
};

pub struct EntityBuilder<'a> {
    container: &'a mut EntityContainer,
    components: Vec<Box<dyn FnOnce(&mut EntityContainer, EntityId)>>,
}

impl<'a> EntityBuilder<'a> {
    pub(crate) fn new(container: &'a mut EntityContainer) -> Self {
        Self {
            container,
            components: Vec::new(),
        }
    }

    pub fn with_component<T: Component>(mut self, component: T) -> Self {
        self.components
            .push(Box::new(move |container, entity_id| {
                container.add_component(entity_id, component);
            }));
        self
    }

    pub fn build(self) -> EntityId {
        let Self {
            container,
            components,
        } = self;

        let entity_id = container.add_new_entity();
        for attach in components {
            attach(container, entity_id);
        }
        entity_id
    }
}
