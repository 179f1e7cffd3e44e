//! Simulation World
//!
//! The World is the single owner of all simulated state: entity
//! allocation, the component storages, and the deferred despawn queue.
//! It is created at scene load, cleared at teardown, and passed by
//! reference into the physics and collision passes - there is no
//! ambient global entity list.
//!
//! Component types are fixed fields, not a runtime type map: this
//! game knows exactly what it simulates.

use super::collider::{Collider, ColliderShape, CollisionResponse};
use super::component::ComponentStorage;
use super::components::{Motion, Projectile, SpriteRect, Tank, Tile, Transform};
use super::entity::{Entity, EntityAllocator};
use crate::math::Vec2;

pub struct World {
    /// Entity allocation and liveness
    entities: EntityAllocator,

    /// Entities queued for removal at the end of the tick. Deferred so
    /// the collision scan can destroy entities it is iterating over.
    despawn_queue: Vec<Entity>,

    // =========================================================================
    // Core components
    // =========================================================================

    /// Position and heading; every entity has one
    pub transforms: ComponentStorage<Transform>,

    /// Kinematic state for entities the integrator moves
    pub motions: ComponentStorage<Motion>,

    /// Shape + response for entities that take part in collision
    pub colliders: ComponentStorage<Collider>,

    /// Tileset source rectangle, read by the renderer
    pub sprites: ComponentStorage<SpriteRect>,

    // =========================================================================
    // Entity type markers
    // =========================================================================

    pub tanks: ComponentStorage<Tank>,
    pub projectiles: ComponentStorage<Projectile>,
    pub tiles: ComponentStorage<Tile>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            despawn_queue: Vec::new(),

            transforms: ComponentStorage::new(),
            motions: ComponentStorage::new(),
            colliders: ComponentStorage::new(),
            sprites: ComponentStorage::new(),

            tanks: ComponentStorage::new(),
            projectiles: ComponentStorage::new(),
            tiles: ComponentStorage::new(),
        }
    }

    // =========================================================================
    // Entity management
    // =========================================================================

    /// Spawn an entity with a default transform.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.entities.allocate();
        self.transforms.insert(entity, Transform::default());
        entity
    }

    pub fn spawn_at(&mut self, position: Vec2) -> Entity {
        let entity = self.entities.allocate();
        self.transforms.insert(entity, Transform::from_position(position));
        entity
    }

    /// Queue an entity for removal at the end of the tick. Safe to call
    /// from inside a scan over the world.
    pub fn despawn(&mut self, entity: Entity) {
        if self.is_alive(entity) {
            self.despawn_queue.push(entity);
        }
    }

    /// Remove an entity and all its components right now. Prefer
    /// `despawn()` while any pass is running.
    pub fn despawn_immediate(&mut self, entity: Entity) {
        if !self.entities.free(entity) {
            return; // already dead
        }

        let idx = entity.index();
        self.transforms.clear_slot(idx);
        self.motions.clear_slot(idx);
        self.colliders.clear_slot(idx);
        self.sprites.clear_slot(idx);
        self.tanks.clear_slot(idx);
        self.projectiles.clear_slot(idx);
        self.tiles.clear_slot(idx);
    }

    /// Process the deferred queue. The tick driver calls this after
    /// the collision pass.
    pub fn flush_despawns(&mut self) {
        let queue = std::mem::take(&mut self.despawn_queue);
        for entity in queue {
            self.despawn_immediate(entity);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Live id occupying a slot index, if any. The system passes use
    /// this to turn storage indices back into ids for events.
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        self.entities.entity_at(index)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// Scene teardown: drop everything, invalidate every id.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.despawn_queue.clear();
        self.transforms.clear();
        self.motions.clear();
        self.colliders.clear();
        self.sprites.clear();
        self.tanks.clear();
        self.projectiles.clear();
        self.tiles.clear();
    }

    // =========================================================================
    // Convenience spawners
    // =========================================================================

    /// Spawn a tank: hull collider that blocks, full motion state.
    pub fn spawn_tank(&mut self, position: Vec2, mass: f32, hull_half_extents: Vec2) -> Entity {
        let entity = self.spawn_at(position);
        self.tanks.insert(entity, Tank);
        self.motions.insert(entity, Motion::new(mass));
        self.colliders.insert(
            entity,
            Collider::new(ColliderShape::aabb(hull_half_extents), CollisionResponse::Block),
        );
        entity
    }

    /// Spawn a shell: point collider that destroys itself on impact.
    pub fn spawn_projectile(&mut self, position: Vec2, velocity: Vec2, owner: Entity) -> Entity {
        let entity = self.spawn_at(position);
        self.projectiles.insert(entity, Projectile { owner });
        self.motions.insert(entity, Motion::new(1.0).with_velocity(velocity));
        self.colliders.insert(
            entity,
            Collider::new(ColliderShape::point(), CollisionResponse::Destroy),
        );
        entity
    }

    /// Spawn a static map tile: sprite plus an optional collider, no
    /// motion state (the integrator skips it).
    pub fn spawn_tile(
        &mut self,
        position: Vec2,
        sprite: SpriteRect,
        collider: Option<Collider>,
    ) -> Entity {
        let entity = self.spawn_at(position);
        self.tiles.insert(entity, Tile);
        self.sprites.insert(entity, sprite);
        if let Some(collider) = collider {
            self.colliders.insert(entity, collider);
        }
        entity
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
