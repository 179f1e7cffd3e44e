//! Tank Game Simulation Core
//!
//! The deterministic per-tick heart of a multiplayer tank game:
//! fixed-order rigid-body integration plus 2D collision detection
//! and response. Everything around it - tilemap parsing, textures,
//! rendering, networking, input - lives outside and talks to this
//! crate through the `World` registry and the `Events` queues.
//!
//! Key concepts:
//! - Entity: generational index for safe entity references
//! - Component: plain data structs attached to entities
//! - World: container for all entities and their components
//! - Simulation: one `tick()` = physics pass, collision scan, despawn flush
//!
//! Design philosophy:
//! - Identical inputs produce bit-identical outputs on every peer
//! - Simple over flexible (we know what game we're making)
//! - No runtime type registration (compile-time known components)

pub mod math;
pub mod entity;
pub mod component;
pub mod components;
pub mod collider;
pub mod physics;
pub mod collision;
pub mod event;
pub mod world;
pub mod scene;
pub mod sim;

// Re-export main types
pub use math::Vec2;
pub use entity::Entity;
pub use components::{Motion, Transform};
pub use collider::{Collider, ColliderShape, CollisionResponse};
pub use event::Events;
pub use world::World;
pub use sim::Simulation;
