//! Demo layer: a swarm of particles that drift, age and respawn.

use glam::Vec3;
use octal_core::Layer;
use octal_ecs::{Entity, Scene};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec3);

/// Seconds left before the entity is destroyed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime(pub f64);

pub struct ParticleLayer {
    scene: Scene,
    /// Particles spawned per second
    spawn_rate: f64,
    spawn_budget: f64,
    spawned: u64,
    despawned: u64,
}

impl ParticleLayer {
    pub fn new(max_entities: u32, spawn_rate: f64) -> Self {
        Self {
            scene: Scene::with_capacity(max_entities),
            spawn_rate,
            spawn_budget: 0.0,
            spawned: 0,
            despawned: 0,
        }
    }

    #[cfg(test)]
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn spawn(&mut self) {
        let n = self.spawned as f32;
        let direction = Vec3::new(n.cos(), 1.0, n.sin()).normalize();
        let mut particle = self.scene.create_entity();
        particle
            .add_component(Position(Vec3::ZERO))
            .add_component(Velocity(direction * 2.0))
            .add_component(Lifetime(1.0 + f64::from(self.spawned as u32 % 4)));
        self.spawned += 1;
    }

    fn integrate(&mut self, dt: f64) {
        let moving: Vec<(Entity, Vec3)> = match self.scene.ecs().registry().get::<Velocity>() {
            Some(store) => store.iter().map(|(e, v)| (e, v.0)).collect(),
            None => return,
        };
        for (entity, velocity) in moving {
            if let Some(position) = self.scene.ecs_mut().get_component_mut::<Position>(entity) {
                position.0 += velocity * dt as f32;
            }
        }
    }

    fn age(&mut self, dt: f64) {
        let Some(store) = self.scene.ecs_mut().registry_mut().get_mut::<Lifetime>() else {
            return;
        };
        let mut expired = Vec::new();
        for (entity, lifetime) in store.iter_mut() {
            lifetime.0 -= dt;
            if lifetime.0 <= 0.0 {
                expired.push(entity);
            }
        }
        for entity in expired {
            self.scene.destroy_entity(entity);
            self.despawned += 1;
        }
    }
}

impl Layer for ParticleLayer {
    fn name(&self) -> &str {
        "particles"
    }

    fn on_push(&mut self) {
        info!(
            "Particle layer ready (capacity {})",
            self.scene.ecs().capacity()
        );
    }

    fn on_pop(&mut self) {
        info!(
            "Particle layer done: {} spawned, {} despawned, {} alive",
            self.spawned,
            self.despawned,
            self.scene.living_count()
        );
    }

    fn on_update(&mut self, dt: f64) {
        self.spawn_budget += self.spawn_rate * dt;
        let limit = self.scene.ecs().capacity() - 1;
        while self.spawn_budget >= 1.0 {
            self.spawn_budget -= 1.0;
            // spawns that do not fit are dropped
            if self.scene.living_count() < limit {
                self.spawn();
            }
        }

        self.integrate(dt);
        self.age(dt);
    }

    fn on_render(&mut self, _dt: f64) {
        debug!("{} particles alive", self.scene.living_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particles_move_and_expire() {
        let mut layer = ParticleLayer::new(64, 10.0);
        layer.on_update(0.5);
        assert_eq!(layer.scene().living_count(), 5);

        let first = Entity::from_raw(1);
        let position = layer.scene().ecs().get_component::<Position>(first).unwrap();
        assert!(position.0.y > 0.0);

        // the first and fifth particles live for one second
        layer.on_update(0.6);
        assert!(!layer.scene().ecs().is_alive(first));
        assert!(!layer.scene().ecs().is_alive(Entity::from_raw(5)));
        assert_eq!(layer.despawned, 2);
    }

    #[test]
    fn spawning_stops_at_capacity() {
        let mut layer = ParticleLayer::new(4, 100.0);
        layer.on_update(0.1);
        assert_eq!(layer.scene().living_count(), 3);
    }
}
