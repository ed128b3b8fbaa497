mod component;
mod component_storage;
mod component_type_registry;
mod entity_builder;
mod entity_container;
mod multi_type_component_storage;
mod project;
mod serialization;
mod signature;
mod system;
mod system_container;

pub use component::*;
pub use component_type_registry::*;
pub use entity_builder::*;
pub use entity_container::*;
pub use project::*;
pub use serialization::*;
pub use signature::*;
pub use system::*;
