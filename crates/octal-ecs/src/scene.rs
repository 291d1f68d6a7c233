use crate::component::Component;
use crate::ecs::Ecs;
use crate::entity::Entity;

/// Owns the ECS of one scene and mints [`EntityHandle`]s into it.
#[derive(Default)]
pub struct Scene {
    ecs: Ecs,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene with room for `capacity - 1` live entities.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            ecs: Ecs::with_capacity(capacity),
        }
    }

    /// Create a new entity in this scene.
    pub fn create_entity(&mut self) -> EntityHandle<'_> {
        let id = self.ecs.create_entity();
        EntityHandle { id, scene: self }
    }

    /// A handle to an existing entity, if it is alive.
    pub fn entity(&mut self, id: Entity) -> Option<EntityHandle<'_>> {
        self.ecs
            .is_alive(id)
            .then_some(EntityHandle { id, scene: self })
    }

    /// Destroy an entity and all of its components.
    pub fn destroy_entity(&mut self, id: Entity) {
        self.ecs.destroy_entity(id);
    }

    pub fn living_count(&self) -> u32 {
        self.ecs.living_count()
    }

    pub fn ecs(&self) -> &Ecs {
        &self.ecs
    }

    pub fn ecs_mut(&mut self) -> &mut Ecs {
        &mut self.ecs
    }
}

/// An entity id bound to the scene that owns it.
///
/// The handle owns nothing; it borrows its scene, so it cannot outlive it.
/// Every operation forwards to the scene's [`Ecs`] with this handle's id.
pub struct EntityHandle<'s> {
    id: Entity,
    scene: &'s mut Scene,
}

impl<'s> EntityHandle<'s> {
    pub fn id(&self) -> Entity {
        self.id
    }

    /// Attach a component, replacing any existing one of the same type.
    pub fn add_component<T: Component>(&mut self, component: T) -> &mut Self {
        self.scene.ecs_mut().add_component(self.id, component);
        self
    }

    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        self.scene.ecs_mut().remove_component::<T>(self.id)
    }

    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.scene.ecs().get_component::<T>(self.id)
    }

    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.scene.ecs_mut().get_component_mut::<T>(self.id)
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.scene.ecs().has_component::<T>(self.id)
    }

    /// Destroy the entity through its scene, consuming the handle.
    pub fn destroy(self) {
        self.scene.destroy_entity(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag(&'static str);

    #[derive(Debug, Clone, PartialEq)]
    struct Health(u32);

    #[test]
    fn create_entity_through_handle() {
        let mut scene = Scene::new();
        let id = {
            let mut handle = scene.create_entity();
            handle.add_component(Tag("player")).add_component(Health(100));
            assert_eq!(handle.get_component::<Tag>(), Some(&Tag("player")));
            assert!(handle.has_component::<Health>());
            handle.id()
        };

        assert_eq!(scene.living_count(), 1);
        assert_eq!(scene.ecs().get_component::<Health>(id), Some(&Health(100)));
    }

    #[test]
    fn handle_forwards_mutation_and_removal() {
        let mut scene = Scene::new();
        let mut handle = scene.create_entity();
        handle.add_component(Health(10));
        handle.get_component_mut::<Health>().unwrap().0 -= 3;
        assert_eq!(handle.get_component::<Health>(), Some(&Health(7)));

        assert_eq!(handle.remove_component::<Health>(), Some(Health(7)));
        assert_eq!(handle.remove_component::<Health>(), None);
        assert!(!handle.has_component::<Health>());
    }

    #[test]
    fn handles_can_be_reminted_from_ids() {
        let mut scene = Scene::with_capacity(8);
        let a = scene.create_entity().id();
        let b = scene.create_entity().id();

        scene.entity(a).unwrap().add_component(Tag("a"));
        scene.entity(b).unwrap().add_component(Tag("b"));

        assert_eq!(scene.ecs().get_component::<Tag>(a), Some(&Tag("a")));
        assert_eq!(scene.ecs().get_component::<Tag>(b), Some(&Tag("b")));
        assert!(scene.entity(Entity::NULL).is_none());
    }

    #[test]
    fn destroy_via_scene_and_handle() {
        let mut scene = Scene::with_capacity(8);
        let a = scene.create_entity().id();
        scene.entity(a).unwrap().add_component(Health(1));

        scene.destroy_entity(a);
        assert!(scene.entity(a).is_none());
        assert_eq!(scene.ecs().get_component::<Health>(a), None);

        let mut handle = scene.create_entity();
        handle.add_component(Health(2));
        let b = handle.id();
        handle.destroy();
        assert_eq!(scene.living_count(), 0);
        assert!(!scene.ecs().is_alive(b));
    }
}
