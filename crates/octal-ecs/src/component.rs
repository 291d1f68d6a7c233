use std::any::Any;

use octal_core::fatal;
use tracing::trace;

use crate::entity::Entity;
use crate::error::EcsError;

/// Marker trait for types that can be stored as ECS components.
pub trait Component: 'static {}

/// Blanket implementation: any `'static` type is a valid component.
impl<T: 'static> Component for T {}

/// Type-erased component storage interface.
///
/// This is the capability every store shares regardless of its element type,
/// which lets the registry treat all stores uniformly.
pub trait ComponentStorage: Any {
    /// Drop whatever component `entity` holds in this store. Returns `true`
    /// if there was one.
    fn entity_destroyed(&mut self, entity: Entity) -> bool;

    /// Number of live components in the store.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the stored component type, for diagnostics.
    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense storage for a single component type.
///
/// Three co-indexed tables keep add, remove and lookup O(1):
/// - `dense` holds the live values packed at `[0, len)`
/// - `sparse` maps entity id to dense index (`None` = no component)
/// - `owners` maps dense index back to the owning entity
///
/// Removal swaps the last value into the vacated slot, so dense order is not
/// stable across removals.
pub struct ComponentStore<T> {
    sparse: Vec<Option<u32>>,
    dense: Vec<T>,
    owners: Vec<Entity>,
}

impl<T: Component> ComponentStore<T> {
    /// Create a store for entity ids `0..capacity`.
    pub fn new(capacity: u32) -> Self {
        Self {
            sparse: vec![None; capacity as usize],
            dense: Vec::with_capacity(capacity as usize),
            owners: Vec::with_capacity(capacity as usize),
        }
    }

    /// Insert a component, or replace the one `entity` already has in place.
    ///
    /// Returns the replaced value. Replacing never consumes a new dense slot.
    pub fn try_add(&mut self, entity: Entity, value: T) -> Result<Option<T>, EcsError> {
        if entity.is_null() {
            return Err(EcsError::NullEntity);
        }
        let capacity = self.capacity();
        let Some(slot) = self.sparse.get_mut(entity.index()) else {
            return Err(EcsError::OutOfRange { entity, capacity });
        };

        if let Some(dense_idx) = *slot {
            trace!("Replacing {} of entity {}", std::any::type_name::<T>(), entity);
            let old = std::mem::replace(&mut self.dense[dense_idx as usize], value);
            return Ok(Some(old));
        }

        // one slot per id below `capacity`, so the dense table cannot overflow
        let dense_idx = self.dense.len();
        trace!("Adding component at {}", dense_idx);
        *slot = Some(dense_idx as u32);
        self.dense.push(value);
        self.owners.push(entity);
        Ok(None)
    }

    /// Insert a component, or replace the one `entity` already has in place.
    ///
    /// # Panics
    ///
    /// Panics (fatal) if `entity` is null or outside the id space.
    pub fn add(&mut self, entity: Entity, value: T) -> Option<T> {
        match self.try_add(entity, value) {
            Ok(old) => old,
            Err(e) => fatal!("{}", e),
        }
    }

    /// Remove the component of `entity`, returning it. No-op if it has none.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let dense_idx = self.sparse.get_mut(entity.index())?.take()? as usize;

        // `swap_remove` moves the last value into `dense_idx`
        let value = self.dense.swap_remove(dense_idx);
        self.owners.swap_remove(dense_idx);
        if let Some(&moved) = self.owners.get(dense_idx) {
            self.sparse[moved.index()] = Some(dense_idx as u32);
        }
        Some(value)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        let dense_idx = (*self.sparse.get(entity.index())?)?;
        self.dense.get(dense_idx as usize)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let dense_idx = (*self.sparse.get(entity.index())?)?;
        self.dense.get_mut(dense_idx as usize)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        matches!(self.sparse.get(entity.index()), Some(Some(_)))
    }

    /// Iterate over all (entity, &component) pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    /// Iterate over all (entity, &mut component) pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }

    /// Owners of the live components, co-indexed with [`Self::values`].
    pub fn entities(&self) -> &[Entity] {
        &self.owners
    }

    /// The packed live components.
    pub fn values(&self) -> &[T] {
        &self.dense
    }

    /// Number of components stored.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Size of the entity id space this store covers.
    pub fn capacity(&self) -> u32 {
        self.sparse.len() as u32
    }

    /// Dense index currently holding the component of `entity`.
    #[cfg(test)]
    pub(crate) fn dense_index(&self, entity: Entity) -> Option<usize> {
        self.sparse.get(entity.index()).copied().flatten().map(|i| i as usize)
    }

    /// Check the sparse/dense/owner tables agree with each other.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.dense.len(), self.owners.len());
        let mut linked = 0;
        for (id, slot) in self.sparse.iter().enumerate() {
            if let Some(dense_idx) = slot {
                let dense_idx = *dense_idx as usize;
                assert!(dense_idx < self.dense.len(), "entity {id} points past the end");
                assert_eq!(self.owners[dense_idx].index(), id);
                linked += 1;
            }
        }
        assert_eq!(linked, self.dense.len());
    }
}

impl<T: Component> ComponentStorage for ComponentStore<T> {
    fn entity_destroyed(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn component_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
