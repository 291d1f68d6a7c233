use std::collections::VecDeque;
use std::fmt;

use octal_core::{fatal, fatal_assert};
use tracing::warn;

use crate::error::EcsError;

/// An entity id. Entities carry no data of their own; they are keys into the
/// component stores.
///
/// Id `0` is reserved as [`Entity::NULL`] and is never handed out.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Entity(u32);

impl Entity {
    /// The "no entity" sentinel.
    pub const NULL: Entity = Entity(0);

    /// Create an entity from a raw id (mainly for testing).
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// The raw id of this entity.
    pub const fn id(self) -> u32 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The id as an index into per-entity tables.
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues and recycles entity ids from a fixed id space.
///
/// Freed ids go to the back of a FIFO queue, so the id that has been free the
/// longest is the next one issued.
pub struct EntityAllocator {
    free: VecDeque<Entity>,
    alive: Vec<bool>,
    living: u32,
    capacity: u32,
}

impl EntityAllocator {
    /// Create an allocator for ids `1..capacity`.
    ///
    /// # Panics
    ///
    /// Panics (fatal) if `capacity` is zero.
    pub fn new(capacity: u32) -> Self {
        fatal_assert!(capacity > 0, "entity capacity must be greater than zero");
        Self {
            free: (1..capacity).map(Entity).collect(),
            alive: vec![false; capacity as usize],
            living: 0,
            capacity,
        }
    }

    /// Issue the least recently freed id.
    pub fn try_allocate(&mut self) -> Result<Entity, EcsError> {
        let entity = self.free.pop_front().ok_or(EcsError::CapacityExhausted {
            living: self.living,
        })?;
        self.alive[entity.index()] = true;
        self.living += 1;
        Ok(entity)
    }

    /// Issue the least recently freed id.
    ///
    /// # Panics
    ///
    /// Panics (fatal) when all `capacity - 1` ids are alive.
    pub fn allocate(&mut self) -> Entity {
        match self.try_allocate() {
            Ok(entity) => entity,
            Err(e) => fatal!("{}", e),
        }
    }

    /// Return an id to the back of the free queue.
    ///
    /// Returns `Ok(false)` and logs a warning if the id is not alive (already
    /// freed, never issued, or null); nothing changes in that case.
    pub fn deallocate(&mut self, entity: Entity) -> Result<bool, EcsError> {
        if entity.id() >= self.capacity {
            return Err(EcsError::OutOfRange {
                entity,
                capacity: self.capacity,
            });
        }
        if !self.alive[entity.index()] {
            warn!("Entity {} already destroyed! Skipping...", entity);
            return Ok(false);
        }
        self.alive[entity.index()] = false;
        self.free.push_back(entity);
        self.living -= 1;
        Ok(true)
    }

    /// Check if an entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Number of currently alive entities.
    pub fn living_count(&self) -> u32 {
        self.living
    }

    /// Number of ids waiting to be issued.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Size of the id space, including the reserved null id.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
