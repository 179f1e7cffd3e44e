//! Entity Identifiers with Generational Indices
//!
//! Entities are lightweight ids referencing slots in the `World`.
//! Each slot carries a generation counter: despawning an entity frees
//! its slot for reuse and bumps the generation, so any id still held
//! by another system (a projectile's `owner`, a net snapshot) stops
//! matching instead of silently pointing at whatever spawned next.
//!
//! This is what makes mid-scan destruction safe: the collision pass
//! can queue a tank for removal while other systems keep stale ids
//! around without ever confusing two occupants of the same slot.

use serde::{Serialize, Deserialize};

/// A unique identifier for a simulated entity.
///
/// Index says which slot, generation says which occupant of that slot.
/// Same index + different generation = different entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Should only be called by EntityAllocator (and tests).
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, used to address component storage.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Sentinel for "no entity" (untargeted projectile owner etc).
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

/// Allocates entity slots and tracks which ids are alive.
///
/// Freed slots are reused LIFO with an incremented generation.
pub struct EntityAllocator {
    /// Current generation of each slot
    generations: Vec<u32>,
    /// Whether each slot is currently occupied
    occupied: Vec<bool>,
    /// Slots available for reuse
    free_indices: Vec<u32>,
    /// Next never-used index
    next_fresh: u32,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            occupied: Vec::new(),
            free_indices: Vec::new(),
            next_fresh: 0,
            alive_count: 0,
        }
    }

    /// Pre-size for a known scene population (e.g. a full tile grid).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            occupied: Vec::with_capacity(capacity),
            free_indices: Vec::new(),
            next_fresh: 0,
            alive_count: 0,
        }
    }

    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Generation was already bumped when the slot was freed
            self.occupied[index as usize] = true;
            Entity::new(index, self.generations[index as usize])
        } else {
            let index = self.next_fresh;
            self.next_fresh += 1;
            self.generations.push(0);
            self.occupied.push(true);
            Entity::new(index, 0)
        }
    }

    /// Free an entity's slot. Returns false if it was already dead.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let idx = entity.index as usize;
        self.generations[idx] += 1;
        self.occupied[idx] = false;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let idx = entity.index as usize;
        idx < self.generations.len()
            && self.occupied[idx]
            && self.generations[idx] == entity.generation
    }

    /// Reconstruct the live id for a slot index, if the slot is occupied.
    ///
    /// The physics and collision passes iterate storage by index; this is
    /// how an index turns back into a full id for despawn queues and events.
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        let idx = index as usize;
        if idx >= self.generations.len() || !self.occupied[idx] {
            return None;
        }
        Some(Entity::new(index, self.generations[idx]))
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Highest index ever handed out + 1.
    pub fn capacity(&self) -> u32 {
        self.next_fresh
    }

    /// Invalidate every live id (scene teardown).
    pub fn clear(&mut self) {
        for gen in &mut self.generations {
            *gen += 1;
        }
        for slot in &mut self.occupied {
            *slot = false;
        }
        self.free_indices.clear();
        for i in 0..self.next_fresh {
            self.free_indices.push(i);
        }
        self.alive_count = 0;
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
