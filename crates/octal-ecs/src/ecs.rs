use octal_core::{fatal, DEFAULT_MAX_ENTITIES};
use tracing::debug;

use crate::component::Component;
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::registry::StoreRegistry;

/// Entity component manager. The single entry point for creating and
/// destroying entities and for attaching components to them.
pub struct Ecs {
    entities: EntityAllocator,
    stores: StoreRegistry,
}

impl Ecs {
    /// An ECS with [`DEFAULT_MAX_ENTITIES`] ids.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTITIES)
    }

    /// An ECS whose id space is `0..capacity`; id 0 is reserved, so at most
    /// `capacity - 1` entities can be alive at once.
    ///
    /// # Panics
    ///
    /// Panics (fatal) if `capacity` is zero.
    pub fn with_capacity(capacity: u32) -> Self {
        debug!("Creating ECS with capacity {}", capacity);
        Self {
            entities: EntityAllocator::new(capacity),
            stores: StoreRegistry::new(capacity),
        }
    }

    // ---- Entity management ----

    pub fn try_create_entity(&mut self) -> Result<Entity, EcsError> {
        self.entities.try_allocate()
    }

    /// Create a new entity with no components.
    ///
    /// # Panics
    ///
    /// Panics (fatal) when every usable id is alive.
    pub fn create_entity(&mut self) -> Entity {
        match self.try_create_entity() {
            Ok(entity) => entity,
            Err(e) => fatal!("{}", e),
        }
    }

    /// Destroy an entity and drop all of its components.
    ///
    /// Returns `Ok(false)` after logging a warning if the entity is not alive.
    pub fn try_destroy_entity(&mut self, entity: Entity) -> Result<bool, EcsError> {
        // the allocator range-checks and warns; stores are only told about live ids
        if !self.entities.deallocate(entity)? {
            return Ok(false);
        }
        let dropped = self.stores.entity_destroyed(entity);
        debug!("Destroyed entity {} ({} components)", entity, dropped);
        Ok(true)
    }

    /// Destroy an entity and drop all of its components.
    ///
    /// Destroying an entity that is not alive logs a warning and does nothing.
    ///
    /// # Panics
    ///
    /// Panics (fatal) if the id is outside the id space.
    pub fn destroy_entity(&mut self, entity: Entity) {
        if let Err(e) = self.try_destroy_entity(entity) {
            fatal!("Invalid entity id given: {}", e);
        }
    }

    /// Check whether an entity is alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of alive entities.
    pub fn living_count(&self) -> u32 {
        self.entities.living_count()
    }

    /// Size of the id space, including the reserved null id.
    pub fn capacity(&self) -> u32 {
        self.entities.capacity()
    }

    // ---- Component management ----

    /// Attach a component, replacing (and returning) any existing one of the same type.
    pub fn try_add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<Option<T>, EcsError> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::DeadEntity(entity));
        }
        self.stores.get_or_create::<T>().try_add(entity, component)
    }

    /// Attach a component, replacing (and returning) any existing one of the same type.
    ///
    /// # Panics
    ///
    /// Panics (fatal) if the entity is not alive.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        match self.try_add_component(entity, component) {
            Ok(old) => old,
            Err(e) => fatal!("cannot add {}: {}", std::any::type_name::<T>(), e),
        }
    }

    /// Remove a component from an entity, returning it. No-op if absent.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.stores.get_mut::<T>()?.remove(entity)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.stores.get::<T>()?.get(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.stores.get_mut::<T>()?.get_mut(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.stores
            .get::<T>()
            .is_some_and(|store| store.contains(entity))
    }

    /// The component stores, for whole-type access.
    pub fn registry(&self) -> &StoreRegistry {
        &self.stores
    }

    pub fn registry_mut(&mut self) -> &mut StoreRegistry {
        &mut self.stores
    }
}

impl Default for Ecs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs<F: FnOnce()>(f: F) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = out.0.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn create_and_destroy() {
        let mut ecs = Ecs::new();
        let e = ecs.create_entity();
        assert!(ecs.is_alive(e));
        assert_eq!(ecs.living_count(), 1);
        ecs.destroy_entity(e);
        assert!(!ecs.is_alive(e));
        assert_eq!(ecs.living_count(), 0);
        assert_eq!(ecs.capacity(), DEFAULT_MAX_ENTITIES);
    }

    #[test]
    fn add_get_remove_component() {
        let mut ecs = Ecs::new();
        let e = ecs.create_entity();
        ecs.add_component(e, Position { x: 1.0, y: 2.0 });
        assert_eq!(
            ecs.get_component::<Position>(e),
            Some(&Position { x: 1.0, y: 2.0 })
        );
        assert!(ecs.has_component::<Position>(e));
        assert_eq!(
            ecs.remove_component::<Position>(e),
            Some(Position { x: 1.0, y: 2.0 })
        );
        assert!(!ecs.has_component::<Position>(e));
        assert_eq!(ecs.get_component::<Position>(e), None);
    }

    #[test]
    fn missing_component_is_none() {
        let mut ecs = Ecs::new();
        let e = ecs.create_entity();
        assert_eq!(ecs.get_component::<Velocity>(e), None);
        assert_eq!(ecs.remove_component::<Velocity>(e), None);
        assert!(ecs.registry().is_empty());
    }

    #[test]
    fn component_mutation() {
        let mut ecs = Ecs::new();
        let e = ecs.create_entity();
        ecs.add_component(e, Position { x: 0.0, y: 0.0 });
        ecs.get_component_mut::<Position>(e).unwrap().x = 5.0;
        assert_eq!(ecs.get_component::<Position>(e).unwrap().x, 5.0);
    }

    #[test]
    fn duplicate_add_replaces() {
        let mut ecs = Ecs::with_capacity(4);
        let e = ecs.create_entity();
        assert_eq!(ecs.add_component(e, Velocity { dx: 1.0, dy: 0.0 }), None);
        assert_eq!(
            ecs.add_component(e, Velocity { dx: 2.0, dy: 0.0 }),
            Some(Velocity { dx: 1.0, dy: 0.0 })
        );
        assert_eq!(ecs.registry().get::<Velocity>().unwrap().len(), 1);
    }

    #[test]
    fn destroy_removes_components_from_every_store() {
        let mut ecs = Ecs::new();
        let a = ecs.create_entity();
        let b = ecs.create_entity();
        ecs.add_component(a, Position { x: 1.0, y: 0.0 });
        ecs.add_component(a, Velocity { dx: 1.0, dy: 0.0 });
        ecs.add_component(b, Position { x: 2.0, y: 0.0 });

        ecs.destroy_entity(a);

        assert_eq!(ecs.get_component::<Position>(a), None);
        assert_eq!(ecs.get_component::<Velocity>(a), None);
        assert_eq!(
            ecs.get_component::<Position>(b),
            Some(&Position { x: 2.0, y: 0.0 })
        );
        assert_eq!(ecs.registry().get::<Position>().unwrap().len(), 1);
        assert!(ecs.registry().get::<Velocity>().unwrap().is_empty());
    }

    #[test]
    fn reused_id_starts_without_components() {
        let mut ecs = Ecs::with_capacity(2);
        let e1 = ecs.create_entity();
        ecs.add_component(e1, Position { x: 1.0, y: 0.0 });
        ecs.destroy_entity(e1);

        let e2 = ecs.create_entity();
        assert_eq!(e1, e2);
        assert_eq!(ecs.get_component::<Position>(e2), None);
    }

    #[test]
    fn double_destroy_warns_and_changes_nothing() {
        let mut ecs = Ecs::with_capacity(3);
        let _e1 = ecs.create_entity();
        let e2 = ecs.create_entity();
        ecs.destroy_entity(e2);

        let logs = capture_logs(|| {
            ecs.destroy_entity(e2);
        });
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Entity 2 already destroyed"));
        assert_eq!(ecs.living_count(), 1);
        assert_eq!(ecs.try_destroy_entity(e2), Ok(false));
    }

    #[test]
    fn failed_destroy_leaves_components_alone() {
        let mut ecs = Ecs::with_capacity(4);
        let a = ecs.create_entity();
        let b = ecs.create_entity();
        ecs.add_component(b, Position { x: 3.0, y: 0.0 });
        ecs.destroy_entity(a);

        let logs = capture_logs(|| {
            assert_eq!(ecs.try_destroy_entity(a), Ok(false));
            assert_eq!(ecs.try_destroy_entity(Entity::NULL), Ok(false));
        });
        assert_eq!(logs.matches("already destroyed").count(), 2);
        assert_eq!(
            ecs.get_component::<Position>(b),
            Some(&Position { x: 3.0, y: 0.0 })
        );
        assert_eq!(ecs.registry().get::<Position>().unwrap().len(), 1);
        assert_eq!(ecs.living_count(), 1);
    }

    #[test]
    fn stale_id_refers_to_reused_entity() {
        // one usable id, so the freed id is the next one issued
        let mut ecs = Ecs::with_capacity(2);
        let e = ecs.create_entity();
        ecs.destroy_entity(e);
        let reused = ecs.create_entity();
        assert_eq!(reused, e);
        ecs.add_component(reused, Position { x: 9.0, y: 9.0 });

        // a stale copy of the id is the same id, and it is alive again
        assert!(ecs.is_alive(e));
        ecs.destroy_entity(reused);
        ecs.destroy_entity(e);
        assert_eq!(ecs.living_count(), 0);
    }

    #[test]
    fn out_of_range_destroy_is_an_error() {
        let mut ecs = Ecs::with_capacity(3);
        assert_eq!(
            ecs.try_destroy_entity(Entity::from_raw(3)),
            Err(EcsError::OutOfRange {
                entity: Entity::from_raw(3),
                capacity: 3
            })
        );
    }

    #[test]
    #[should_panic(expected = "Invalid entity id given")]
    fn out_of_range_destroy_is_fatal() {
        let mut ecs = Ecs::with_capacity(3);
        ecs.destroy_entity(Entity::from_raw(7));
    }

    #[test]
    #[should_panic(expected = "max entities exceeded")]
    fn create_past_capacity_is_fatal() {
        let mut ecs = Ecs::with_capacity(3);
        for _ in 0..3 {
            ecs.create_entity();
        }
    }

    #[test]
    fn add_to_dead_entity_is_rejected() {
        let mut ecs = Ecs::with_capacity(4);
        let e = ecs.create_entity();
        ecs.destroy_entity(e);
        assert_eq!(
            ecs.try_add_component(e, Position { x: 0.0, y: 0.0 }),
            Err(EcsError::DeadEntity(e))
        );
        assert_eq!(
            ecs.try_add_component(Entity::NULL, 1u8),
            Err(EcsError::DeadEntity(Entity::NULL))
        );
    }

    #[test]
    #[should_panic(expected = "is not alive")]
    fn add_to_dead_entity_is_fatal() {
        let mut ecs = Ecs::with_capacity(4);
        ecs.add_component(Entity::from_raw(2), 1u8);
    }
}
