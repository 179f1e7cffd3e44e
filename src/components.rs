//! Simulation Components
//!
//! Plain data structs attached to entities - behavior lives in the
//! physics and collision passes. Angles are degrees throughout, the
//! convention the whole game (sprites, turret headings, net snapshots)
//! shares.

use serde::{Serialize, Deserialize};
use crate::math::Vec2;
use super::entity::Entity;

// =============================================================================
// Transform
// =============================================================================

/// Where an entity is and which way it faces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    /// World position, pixels
    pub position: Vec2,
    /// Heading in degrees
    pub rotation: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec2::ZERO,
        rotation: 0.0,
    };

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }

    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.position = self.position + offset;
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.rotation += degrees;
    }

    /// Unit vector the entity is facing. 0 degrees is +X, angles grow
    /// counterclockwise.
    pub fn heading(&self) -> Vec2 {
        let radians = self.rotation.to_radians();
        Vec2::new(radians.cos(), radians.sin())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// =============================================================================
// Motion state
// =============================================================================

/// Full kinematic state for an entity the integrator advances.
///
/// `thrust` and `angular_thrust` are the inputs the driver (player
/// input, AI, net) writes; `force` and `torque` are the nets the
/// integrator recomputes from them every tick. Everything else is
/// carried state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Motion {
    /// Units: pixels/s
    pub velocity: Vec2,
    /// Units: pixels/s², recomputed each tick
    pub acceleration: Vec2,
    /// Net force this tick, recomputed from thrust and friction
    pub force: Vec2,
    /// Propulsion input, held by the driver between ticks
    pub thrust: Vec2,
    pub mass: f32,

    /// Degrees/s
    pub angular_velocity: f32,
    /// Degrees/s², recomputed each tick
    pub angular_acceleration: f32,
    /// Net turning force this tick
    pub torque: f32,
    /// Turning input, held by the driver between ticks
    pub angular_thrust: f32,
    /// Rotation applied during the last tick, degrees
    pub delta_rotation: f32,

    /// Position at the start of the last integration step.
    /// The Block collision response reverts to this.
    pub prev_position: Vec2,
}

impl Motion {
    pub fn new(mass: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            force: Vec2::ZERO,
            thrust: Vec2::ZERO,
            mass,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            torque: 0.0,
            angular_thrust: 0.0,
            delta_rotation: 0.0,
            prev_position: Vec2::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_thrust(mut self, thrust: Vec2) -> Self {
        self.thrust = thrust;
        self
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::new(1.0)
    }
}

// =============================================================================
// Renderer-facing sprite data
// =============================================================================

/// Source rectangle into the tileset texture, in pixels. The renderer
/// reads this plus the post-tick transform; the simulation only ever
/// writes it at scene load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl SpriteRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

// =============================================================================
// Entity type markers
// =============================================================================

/// Marks a player-controlled or AI tank.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Tank;

/// Marks a fired shell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    /// Who fired it (for kill attribution; may be stale after the
    /// shooter dies, which the generation check catches)
    pub owner: Entity,
}

/// Marks a static map tile.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Tile;
