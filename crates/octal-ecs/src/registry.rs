use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use octal_core::fatal;
use tracing::info;

use crate::component::{Component, ComponentStorage, ComponentStore};
use crate::entity::Entity;

/// Sequential id of a component type within one [`StoreRegistry`].
///
/// Ids are handed out in first-use order and are only meaningful for the
/// registry that issued them. Do not persist them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(u32);

impl ComponentTypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owns one [`ComponentStore`] per component type, created on first use.
pub struct StoreRegistry {
    type_ids: HashMap<TypeId, ComponentTypeId>,
    /// Indexed by [`ComponentTypeId`].
    stores: Vec<Box<dyn ComponentStorage>>,
    capacity: u32,
}

impl StoreRegistry {
    /// Create an empty registry whose stores cover entity ids `0..capacity`.
    pub fn new(capacity: u32) -> Self {
        Self {
            type_ids: HashMap::new(),
            stores: Vec::new(),
            capacity,
        }
    }

    /// The id of `T`, if a store for it exists.
    pub fn type_id_of<T: Component>(&self) -> Option<ComponentTypeId> {
        self.type_ids.get(&TypeId::of::<T>()).copied()
    }

    fn register<T: Component>(&mut self) -> ComponentTypeId {
        let id = ComponentTypeId(self.stores.len() as u32);
        info!("Adding component type {} ({})", id, type_name::<T>());
        self.stores
            .push(Box::new(ComponentStore::<T>::new(self.capacity)));
        self.type_ids.insert(TypeId::of::<T>(), id);
        id
    }

    /// The store for `T`, created if this is the first time `T` is seen.
    pub fn get_or_create<T: Component>(&mut self) -> &mut ComponentStore<T> {
        let id = match self.type_id_of::<T>() {
            Some(id) => id,
            None => self.register::<T>(),
        };
        self.stores[id.index()]
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .unwrap_or_else(|| fatal!("component store type mismatch for {}", type_name::<T>()))
    }

    pub fn get<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let id = self.type_id_of::<T>()?;
        self.stores[id.index()]
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        let id = self.type_id_of::<T>()?;
        self.stores[id.index()]
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
    }

    /// Tell every store that `entity` is gone. Returns how many components
    /// were dropped.
    pub fn entity_destroyed(&mut self, entity: Entity) -> usize {
        let mut removed = 0;
        for store in &mut self.stores {
            if store.entity_destroyed(entity) {
                removed += 1;
            }
        }
        removed
    }

    /// All stores in type-id order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentTypeId, &dyn ComponentStorage)> {
        self.stores
            .iter()
            .enumerate()
            .map(|(i, store)| (ComponentTypeId(i as u32), &**store))
    }

    /// Number of component types with a store.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Size of the entity id space every store covers.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
