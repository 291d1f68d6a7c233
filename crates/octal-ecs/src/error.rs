use crate::entity::Entity;

/// Errors returned by the checked (`try_*`) ECS operations.
///
/// The unchecked operations treat every one of these as a programmer error
/// and go through `octal_core::fatal!` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    #[error("max entities exceeded: all {living} usable ids are alive")]
    CapacityExhausted { living: u32 },

    #[error("entity {entity} is out of range for capacity {capacity}")]
    OutOfRange { entity: Entity, capacity: u32 },

    #[error("the null entity cannot hold components")]
    NullEntity,

    #[error("entity {0} is not alive")]
    DeadEntity(Entity),
}
