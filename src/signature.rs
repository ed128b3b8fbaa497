use crate::component_type_registry::ComponentTypeId;

pub const MAX_COMPONENT_COUNT: usize = 32;

/// Set of component type ids attached to an entity, or required by a system.
/// Type ids are dense indices below `MAX_COMPONENT_COUNT`, so a bitset covers
/// the whole id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signature(u32);

impl Signature {
    pub fn insert(&mut self, type_id: ComponentTypeId) {
        self.0 |= 1u32 << type_id.index();
    }

    pub fn remove(&mut self, type_id: ComponentTypeId) {
        self.0 &= !(1u32 << type_id.index());
    }

    pub fn contains(&self, type_id: ComponentTypeId) -> bool {
        self.0 & (1u32 << type_id.index()) != 0
    }

    pub fn is_superset_of(&self, other: &Signature) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = ComponentTypeId> {
        let bits = self.0;
        (0..MAX_COMPONENT_COUNT)
            .filter(move |index| bits & (1u32 << index) != 0)
            .map(ComponentTypeId)
    }
}

#[macro_export]
macro_rules! component_signature {
    ($types:expr, $component_type0:ty $(, $component_types:ty)* $(,)?) => {{
        let mut signature = $crate::Signature::default();
        signature.insert($types.kind_id::<$component_type0>());
        $(
            signature.insert($types.kind_id::<$component_types>());
        )*
        signature
    }};
}
