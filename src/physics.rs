//! Fixed-Order Rigid Body Integration
//!
//! One semi-implicit Euler step per entity per tick. The step order is
//! the multiplayer contract: every peer runs force, acceleration,
//! velocity, position, then the angular chain, in exactly this
//! sequence, so identical inputs produce bit-identical state on every
//! machine. Nothing here is allowed to branch on entity type or
//! reorder per call.
//!
//! Inputs are not validated. Negative mass, NaN thrust, or an absurd
//! delta are caller contract violations and propagate as-is.

use serde::{Serialize, Deserialize};
use crate::components::{Motion, Transform};
use crate::world::World;

/// Tick deltas arrive as integer milliseconds; integration runs in
/// seconds. Fixed design parameter, not per-call configurable.
pub const MILLIS_PER_SECOND: f32 = 1000.0;

/// Per-scene integration parameters. Loaded with the scene (see
/// `scene::settings_from_ron`), fixed while the simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSettings {
    /// Velocity-proportional drag on movement, N·s/pixel. Zero means
    /// tanks coast forever.
    pub linear_friction: f32,
    /// Angular-velocity-proportional drag on turning.
    pub angular_friction: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            linear_friction: 0.0,
            angular_friction: 0.0,
        }
    }
}

/// Advance one entity by `delta_ms` milliseconds.
///
/// The eight sub-steps run in a fixed order, each feeding the next:
/// net force, acceleration, velocity (with the acceleration just
/// computed - that is what makes it semi-implicit), position, then
/// torque, angular acceleration, angular velocity, rotation.
pub fn integrate(
    settings: &PhysicsSettings,
    delta_ms: u64,
    transform: &mut Transform,
    motion: &mut Motion,
) {
    let dt = delta_ms as f32 / MILLIS_PER_SECOND;

    // Remembered for the Block collision response
    motion.prev_position = transform.position;

    update_force(settings, motion);
    update_acceleration(motion);
    update_velocity(dt, motion);
    update_position(dt, transform, motion);

    update_torque(settings, motion);
    update_angular_acceleration(motion);
    update_angular_velocity(dt, motion);
    update_delta_rotation(dt, transform, motion);
}

/// Net force from current inputs: drive thrust minus speed-proportional
/// drag. This is the one domain-specific hook in the chain.
pub fn update_force(settings: &PhysicsSettings, motion: &mut Motion) {
    motion.force = motion.thrust - motion.velocity.scale(settings.linear_friction);
}

pub fn update_acceleration(motion: &mut Motion) {
    motion.acceleration = motion.force.scale(1.0 / motion.mass);
}

pub fn update_velocity(dt: f32, motion: &mut Motion) {
    motion.velocity = motion.velocity + motion.acceleration.scale(dt);
}

pub fn update_position(dt: f32, transform: &mut Transform, motion: &Motion) {
    transform.position = transform.position + motion.velocity.scale(dt);
}

/// Angular analogue of `update_force`.
pub fn update_torque(settings: &PhysicsSettings, motion: &mut Motion) {
    motion.torque = motion.angular_thrust - motion.angular_velocity * settings.angular_friction;
}

pub fn update_angular_acceleration(motion: &mut Motion) {
    motion.angular_acceleration = motion.torque / motion.mass;
}

pub fn update_angular_velocity(dt: f32, motion: &mut Motion) {
    motion.angular_velocity += motion.angular_acceleration * dt;
}

pub fn update_delta_rotation(dt: f32, transform: &mut Transform, motion: &mut Motion) {
    motion.delta_rotation = motion.angular_velocity * dt;
    transform.rotation += motion.delta_rotation;
}

/// The per-tick physics pass: integrate every entity that has both a
/// transform and motion state. Static scenery (transform, no motion)
/// is skipped entirely. Iterates by stable slot index; storages only
/// ever hold components of live entities.
pub fn run(world: &mut World, settings: &PhysicsSettings, delta_ms: u64) {
    for (idx, motion) in world.motions.iter_mut() {
        if let Some(transform) = world.transforms.get_index_mut(idx) {
            integrate(settings, delta_ms, transform, motion);
        }
    }
}
