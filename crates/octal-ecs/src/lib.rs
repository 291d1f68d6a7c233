//! Octal ECS - Entity Component System
//!
//! Entities are plain integer ids from a fixed id space, recycled in FIFO
//! order. Each component type lives in its own dense store with sparse-set
//! lookup, so add, remove and get are all O(1).

mod component;
mod ecs;
mod entity;
mod error;
mod registry;
mod scene;

pub use component::{Component, ComponentStorage, ComponentStore};
pub use ecs::Ecs;
pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use registry::{ComponentTypeId, StoreRegistry};
pub use scene::{EntityHandle, Scene};
