//! Simulation Events
//!
//! The core never calls the renderer, audio, or the net layer. It
//! records what happened during a tick in these queues and the
//! excluded subsystems read them afterwards:
//! 1. Collision scan detects contact -> sends CollisionEvent
//! 2. Audio plays an impact sound, VFX spawns sparks
//! 3. Net layer tells the other peers who got destroyed
//!
//! Queues are drained (or cleared wholesale) by the frame driver
//! before the next tick.

use super::entity::Entity;
use crate::math::Vec2;

/// A queue for events of a single type, collected during the tick.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Look without consuming.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Consume all events, clearing the queue.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// All queues the simulation core writes.
pub struct Events {
    /// Two colliders overlapped this tick
    pub collision: EventQueue<CollisionEvent>,

    /// An entity's Destroy response fired and it left the world
    pub destroyed: EventQueue<DestroyedEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self {
            collision: EventQueue::new(),
            destroyed: EventQueue::new(),
        }
    }

    /// Clear every queue. Call once the frame's readers are done.
    pub fn clear_all(&mut self) {
        self.collision.clear();
        self.destroyed.clear();
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Event types
// =============================================================================

/// Two entities' colliders overlapped.
#[derive(Debug, Clone, Copy)]
pub struct CollisionEvent {
    pub entity_a: Entity,
    pub entity_b: Entity,
    /// Midpoint between the two shapes, good enough for VFX
    pub point: Vec2,
}

/// An entity was removed by its Destroy response.
#[derive(Debug, Clone, Copy)]
pub struct DestroyedEvent {
    /// Who was destroyed (already queued for despawn)
    pub entity: Entity,
    /// What it hit
    pub by: Entity,
    /// Where, for explosion placement
    pub position: Vec2,
}
