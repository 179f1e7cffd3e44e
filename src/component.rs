//! Component Storage
//!
//! Components are plain data attached to entities. `ComponentStorage<T>`
//! is a sparse array mapping entity indices to component data: `Option`
//! holes where an entity lacks the component. A tile has a collider but
//! no motion state; a camera target might have neither.
//!
//! Storing at most one `T` per slot is what enforces "at most one
//! collider per entity" - the invariant is structural, not checked.

use super::entity::Entity;

/// Sparse storage for a single component type, indexed by
/// `entity.index()` (generation is the allocator's concern).
pub struct ComponentStorage<T> {
    data: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Insert a component, replacing any existing one.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx] = Some(component);
    }

    /// Remove and return an entity's component, if present.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let idx = entity.index() as usize;
        if idx < self.data.len() {
            self.data[idx].take()
        } else {
            None
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        let idx = entity.index() as usize;
        self.data.get(idx).and_then(|opt| opt.as_ref())
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let idx = entity.index() as usize;
        self.data.get_mut(idx).and_then(|opt| opt.as_mut())
    }

    /// Access by raw slot index. The system passes iterate snapshots of
    /// indices, so they address storage this way.
    pub fn get_index(&self, index: u32) -> Option<&T> {
        self.data.get(index as usize).and_then(|opt| opt.as_ref())
    }

    pub fn get_index_mut(&mut self, index: u32) -> Option<&mut T> {
        self.data.get_mut(index as usize).and_then(|opt| opt.as_mut())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        idx < self.data.len() && self.data[idx].is_some()
    }

    /// Iterate (slot index, component). Liveness must be checked against
    /// the allocator separately.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_ref().map(|c| (idx as u32, c)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_mut().map(|c| (idx as u32, c)))
    }

    /// Drop whatever component occupies a slot (entity despawn cleanup).
    pub fn clear_slot(&mut self, index: u32) {
        let idx = index as usize;
        if idx < self.data.len() {
            self.data[idx] = None;
        }
    }

    pub fn clear(&mut self) {
        for slot in &mut self.data {
            *slot = None;
        }
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|opt| opt.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut storage: ComponentStorage<f32> = ComponentStorage::new();
        let entity = Entity::new(4, 0);

        storage.insert(entity, 9.5);
        assert_eq!(storage.get(entity), Some(&9.5));
        assert!(storage.contains(entity));

        assert_eq!(storage.remove(entity), Some(9.5));
        assert!(!storage.contains(entity));
        assert_eq!(storage.remove(entity), None);
    }

    #[test]
    fn test_holes_stay_empty() {
        let mut storage: ComponentStorage<u8> = ComponentStorage::new();

        // Insert at slot 40 without touching 0..40
        storage.insert(Entity::new(40, 0), 7);
        assert_eq!(storage.get_index(40), Some(&7));
        assert!(!storage.contains(Entity::new(12, 0)));
        assert_eq!(storage.count(), 1);
    }

    #[test]
    fn test_index_access_ignores_generation() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        storage.insert(Entity::new(2, 3), "turret");

        // Same slot, any generation - storage doesn't care
        assert_eq!(storage.get(Entity::new(2, 9)), Some(&"turret"));
        assert_eq!(storage.get_index(2), Some(&"turret"));
    }

    #[test]
    fn test_iteration_skips_holes() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        storage.insert(Entity::new(0, 0), 10);
        storage.insert(Entity::new(3, 0), 30);
        storage.insert(Entity::new(5, 0), 50);

        let items: Vec<_> = storage.iter().collect();
        assert_eq!(items, vec![(0, &10), (3, &30), (5, &50)]);
    }

    #[test]
    fn test_clear_slot() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        storage.insert(Entity::new(1, 0), 1);
        storage.clear_slot(1);
        assert_eq!(storage.get_index(1), None);
        // Clearing an out-of-range slot is fine
        storage.clear_slot(1000);
    }
}
