//! The Tick
//!
//! One `tick()` advances the whole simulation by a millisecond delta:
//! physics pass over every moving entity, then the collision scan,
//! then the deferred despawn flush. The three phases always run in
//! that order and never interleave - the `&mut self` receiver makes
//! overlapping ticks unrepresentable, which is half of the multiplayer
//! determinism story (the fixed integration order is the other half).
//!
//! Per tick an entity goes Idle -> Integrated -> Tested -> Idle, or
//! out of the world entirely if a Destroy response fired. Removal is
//! terminal: the id never comes back.

use crate::collision;
use crate::event::Events;
use crate::physics::{self, PhysicsSettings};
use crate::world::World;

/// Owns the world, the event queues, and the scene's physics
/// parameters. The game loop drives it; the renderer and net layer
/// read from it between ticks.
pub struct Simulation {
    pub world: World,
    pub events: Events,
    pub settings: PhysicsSettings,
    /// Print one line per contact (off in release play)
    pub debug_log: bool,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_settings(PhysicsSettings::default())
    }

    pub fn with_settings(settings: PhysicsSettings) -> Self {
        Self {
            world: World::new(),
            events: Events::new(),
            settings,
            debug_log: false,
        }
    }

    /// Advance everything by `delta_ms` milliseconds.
    ///
    /// Deltas must be non-negative and sane; clamping a wild frame
    /// spike is the game loop's job, before it gets here.
    pub fn tick(&mut self, delta_ms: u64) {
        physics::run(&mut self.world, &self.settings, delta_ms);
        collision::run(&mut self.world, &mut self.events, self.debug_log);
        self.world.flush_despawns();
    }

    /// Drop this frame's events. Call after the frame's readers
    /// (renderer, audio, net) are done with them.
    pub fn end_frame(&mut self) {
        self.events.clear_all();
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
