//! Collision Scan and Response
//!
//! Once per tick, after the physics pass: find every overlapping
//! collider pair, report it, and apply each entity's own response
//! policy. The scan works on a snapshot of live collider-bearing
//! entities taken at its start, and destruction goes through the
//! world's deferred despawn queue, so removal mid-scan can never
//! invalidate the iteration.
//!
//! Pair order is index order (or sorted grid candidates), fixed for
//! the whole tick; every unordered pair is evaluated at most once and
//! an entity is never tested against itself.

use std::collections::HashMap;

use crate::collider::{contact_normal, overlaps, CollisionResponse};
use crate::entity::Entity;
use crate::event::{CollisionEvent, DestroyedEvent, Events};
use crate::math::Vec2;
use crate::world::World;

/// Below this many colliders the all-pairs scan is cheaper than
/// building the grid.
const BROAD_PHASE_THRESHOLD: usize = 64;

/// Broad phase cell size, pixels. Two tiles wide: big enough that
/// most shapes span a cell or two, small enough to thin out pairs.
const GRID_CELL_SIZE: f32 = 64.0;

/// The per-tick collision pass.
///
/// Entities without a collider never participate; absence of overlap
/// is silent. `debug_log` prints one structured line per contact.
pub fn run(world: &mut World, events: &mut Events, debug_log: bool) {
    // Snapshot of (slot index, id) for everything scannable this tick,
    // in index order, with world bounds for the broad phase.
    let mut snapshot: Vec<(u32, Entity)> = Vec::new();
    let mut bounds: Vec<(Vec2, Vec2)> = Vec::new();
    for (idx, collider) in world.colliders.iter() {
        let Some(transform) = world.transforms.get_index(idx) else { continue };
        if let Some(entity) = world.entity_at(idx) {
            snapshot.push((idx, entity));
            bounds.push(collider.shape.world_bounds(transform.position));
        }
    }

    let pairs = if snapshot.len() <= BROAD_PHASE_THRESHOLD {
        all_pairs(snapshot.len())
    } else {
        grid_pairs(&bounds)
    };

    // Entities destroyed earlier in this scan stop colliding for the
    // rest of it, but their slots stay valid until the despawn flush.
    let mut destroyed = vec![false; snapshot.len()];

    for (sa, sb) in pairs {
        if destroyed[sa] || destroyed[sb] {
            continue;
        }

        let (idx_a, ent_a) = snapshot[sa];
        let (idx_b, ent_b) = snapshot[sb];

        let Some(col_a) = world.colliders.get_index(idx_a).copied() else { continue };
        let Some(col_b) = world.colliders.get_index(idx_b).copied() else { continue };
        let Some(pos_a) = world.transforms.get_index(idx_a).map(|t| t.position) else { continue };
        let Some(pos_b) = world.transforms.get_index(idx_b).map(|t| t.position) else { continue };

        if !overlaps(&col_a.shape, pos_a, &col_b.shape, pos_b) {
            continue;
        }

        let center_a = col_a.shape.world_center(pos_a);
        let center_b = col_b.shape.world_center(pos_b);
        let contact = (center_a + center_b).scale(0.5);

        if debug_log {
            println!(
                "HIT|a:{}({:?})|b:{}({:?})|at:({:.1},{:.1})",
                idx_a, col_a.response, idx_b, col_b.response, contact.x, contact.y
            );
        }

        events.collision.send(CollisionEvent {
            entity_a: ent_a,
            entity_b: ent_b,
            point: contact,
        });

        // Normal pointing from b toward a; b sees the opposite.
        let normal = contact_normal(&col_a.shape, pos_a, &col_b.shape, pos_b);

        apply_response(world, events, col_a.response, ent_a, ent_b, normal, contact);
        if col_a.response == CollisionResponse::Destroy {
            destroyed[sa] = true;
        }
        apply_response(world, events, col_b.response, ent_b, ent_a, -normal, contact);
        if col_b.response == CollisionResponse::Destroy {
            destroyed[sb] = true;
        }
    }
}

/// Apply one entity's own policy to itself. `normal` points from the
/// other collider toward this one.
fn apply_response(
    world: &mut World,
    events: &mut Events,
    response: CollisionResponse,
    entity: Entity,
    other: Entity,
    normal: Vec2,
    contact: Vec2,
) {
    match response {
        CollisionResponse::Ignore => {}

        CollisionResponse::Block => {
            // Undo this tick's movement. Static scenery has no motion
            // state and never moved, so there is nothing to revert.
            let idx = entity.index();
            if let Some(motion) = world.motions.get_index_mut(idx) {
                let prev = motion.prev_position;
                motion.velocity = Vec2::ZERO;
                if let Some(transform) = world.transforms.get_index_mut(idx) {
                    transform.position = prev;
                }
            }
        }

        CollisionResponse::Destroy => {
            world.despawn(entity);
            events.destroyed.send(DestroyedEvent {
                entity,
                by: other,
                position: contact,
            });
        }

        CollisionResponse::Bounce => {
            if let Some(motion) = world.motions.get_index_mut(entity.index()) {
                motion.velocity = motion.velocity.reflect(normal);
            }
        }
    }
}

/// Every unordered pair of snapshot positions, in scan order.
fn all_pairs(count: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(count.saturating_mul(count.saturating_sub(1)) / 2);
    for a in 0..count {
        for b in (a + 1)..count {
            pairs.push((a, b));
        }
    }
    pairs
}

/// Uniform-grid broad phase: bucket each collider's bounds into the
/// cells they touch, pair up bucket members, then sort and dedupe so
/// the result is deterministic regardless of hash order.
///
/// Overlapping shapes have overlapping bounds, and overlapping bounds
/// always share at least one cell, so this never misses a pair the
/// all-pairs scan would find.
fn grid_pairs(bounds: &[(Vec2, Vec2)]) -> Vec<(usize, usize)> {
    let mut cells: HashMap<(i32, i32), Vec<usize>> = HashMap::new();

    for (i, (min, max)) in bounds.iter().enumerate() {
        let cx0 = (min.x / GRID_CELL_SIZE).floor() as i32;
        let cy0 = (min.y / GRID_CELL_SIZE).floor() as i32;
        let cx1 = (max.x / GRID_CELL_SIZE).floor() as i32;
        let cy1 = (max.y / GRID_CELL_SIZE).floor() as i32;

        for cx in cx0..=cx1 {
            for cy in cy0..=cy1 {
                cells.entry((cx, cy)).or_default().push(i);
            }
        }
    }

    let mut pairs = Vec::new();
    for bucket in cells.values() {
        for (k, &a) in bucket.iter().enumerate() {
            for &b in &bucket[k + 1..] {
                pairs.push(if a < b { (a, b) } else { (b, a) });
            }
        }
    }

    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{Collider, ColliderShape};
    use crate::components::Motion;

    fn world_with(entries: &[(Vec2, ColliderShape, CollisionResponse)]) -> (World, Vec<Entity>) {
        let mut world = World::new();
        let ids = entries
            .iter()
            .map(|&(pos, shape, response)| {
                let e = world.spawn_at(pos);
                world.colliders.insert(e, Collider::new(shape, response));
                e
            })
            .collect();
        (world, ids)
    }

    #[test]
    fn test_no_overlap_is_silent() {
        let (mut world, _) = world_with(&[
            (Vec2::ZERO, ColliderShape::circle(1.0), CollisionResponse::Destroy),
            (Vec2::new(10.0, 0.0), ColliderShape::circle(1.0), CollisionResponse::Destroy),
        ]);
        let mut events = Events::new();

        run(&mut world, &mut events, false);

        assert!(events.collision.is_empty());
        assert!(events.destroyed.is_empty());
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn test_overlap_reports_once_per_pair() {
        let (mut world, ids) = world_with(&[
            (Vec2::ZERO, ColliderShape::circle(2.0), CollisionResponse::Ignore),
            (Vec2::new(1.0, 0.0), ColliderShape::circle(2.0), CollisionResponse::Ignore),
        ]);
        let mut events = Events::new();

        run(&mut world, &mut events, false);

        assert_eq!(events.collision.len(), 1);
        let hit = events.collision.iter().next().unwrap();
        assert_eq!(hit.entity_a, ids[0]);
        assert_eq!(hit.entity_b, ids[1]);
    }

    #[test]
    fn test_entity_never_collides_with_itself() {
        // One fat collider alone in the world: nothing to hit
        let (mut world, _) = world_with(&[
            (Vec2::ZERO, ColliderShape::circle(1000.0), CollisionResponse::Destroy),
        ]);
        let mut events = Events::new();

        run(&mut world, &mut events, false);

        assert!(events.collision.is_empty());
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_entity_without_collider_is_skipped() {
        let (mut world, _) = world_with(&[
            (Vec2::ZERO, ColliderShape::circle(5.0), CollisionResponse::Destroy),
        ]);
        // Bystander inside the circle but with no collider of its own
        world.spawn_at(Vec2::new(1.0, 0.0));
        let mut events = Events::new();

        run(&mut world, &mut events, false);

        assert!(events.collision.is_empty());
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn test_block_reverts_to_pre_tick_position() {
        let (mut world, ids) = world_with(&[
            (Vec2::new(0.9, 0.0), ColliderShape::circle(0.5), CollisionResponse::Block),
            (Vec2::ZERO, ColliderShape::aabb(Vec2::new(0.5, 0.5)), CollisionResponse::Ignore),
        ]);
        // The mover integrated into the wall this tick: prev was clear
        let mut motion = Motion::new(1.0).with_velocity(Vec2::new(-3.0, 0.0));
        motion.prev_position = Vec2::new(2.0, 0.0);
        world.motions.insert(ids[0], motion);
        let mut events = Events::new();

        run(&mut world, &mut events, false);

        let t = world.transforms.get(ids[0]).unwrap();
        let m = world.motions.get(ids[0]).unwrap();
        assert_eq!(t.position, Vec2::new(2.0, 0.0));
        assert_eq!(m.velocity, Vec2::ZERO);
        assert_eq!(events.collision.len(), 1);
    }

    #[test]
    fn test_destroy_removes_after_flush() {
        let (mut world, ids) = world_with(&[
            (Vec2::ZERO, ColliderShape::point(), CollisionResponse::Destroy),
            (Vec2::ZERO, ColliderShape::point(), CollisionResponse::Ignore),
        ]);
        let mut events = Events::new();

        run(&mut world, &mut events, false);

        // Deferred: still alive until the flush the tick driver does
        assert!(world.is_alive(ids[0]));
        world.flush_despawns();
        assert!(!world.is_alive(ids[0]));
        assert!(world.is_alive(ids[1]));
        assert_eq!(events.destroyed.len(), 1);
        let gone = events.destroyed.iter().next().unwrap();
        assert_eq!(gone.entity, ids[0]);
        assert_eq!(gone.by, ids[1]);
    }

    #[test]
    fn test_destroy_during_scan_still_processes_third() {
        // Three overlapping entities; the middle one destroys itself on
        // first contact. The A-C pair must still be evaluated, and B
        // must not be double-processed.
        let (mut world, ids) = world_with(&[
            (Vec2::ZERO, ColliderShape::circle(1.0), CollisionResponse::Ignore),
            (Vec2::new(0.5, 0.0), ColliderShape::circle(1.0), CollisionResponse::Destroy),
            (Vec2::new(1.0, 0.0), ColliderShape::circle(1.0), CollisionResponse::Ignore),
        ]);
        let mut events = Events::new();

        run(&mut world, &mut events, false);
        world.flush_despawns();

        // Pairs hit: (A,B) destroys B, (A,C) still runs, (B,C) skipped
        assert_eq!(events.collision.len(), 2);
        assert_eq!(events.destroyed.len(), 1);
        let reported: Vec<_> = events
            .collision
            .iter()
            .map(|c| (c.entity_a, c.entity_b))
            .collect();
        assert!(reported.contains(&(ids[0], ids[1])));
        assert!(reported.contains(&(ids[0], ids[2])));
        assert!(!world.is_alive(ids[1]));
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn test_bounce_reflects_velocity() {
        let (mut world, ids) = world_with(&[
            (Vec2::new(-0.8, 0.0), ColliderShape::circle(0.5), CollisionResponse::Bounce),
            (Vec2::ZERO, ColliderShape::aabb(Vec2::new(0.5, 2.0)), CollisionResponse::Ignore),
        ]);
        world
            .motions
            .insert(ids[0], Motion::new(1.0).with_velocity(Vec2::new(4.0, 1.0)));
        let mut events = Events::new();

        run(&mut world, &mut events, false);

        // Wall face normal is -X: the x component flips, y survives
        let m = world.motions.get(ids[0]).unwrap();
        assert!((m.velocity.x + 4.0).abs() < 1e-4);
        assert!((m.velocity.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_grid_matches_all_pairs() {
        // Scatter enough colliders to trip the broad phase and check
        // the grid finds exactly what brute force finds.
        let mut entries = Vec::new();
        for i in 0..80 {
            let x = (i % 10) as f32 * 40.0;
            let y = (i / 10) as f32 * 40.0;
            entries.push((
                Vec2::new(x, y),
                ColliderShape::circle(25.0),
                CollisionResponse::Ignore,
            ));
        }
        let (mut world, _) = world_with(&entries);
        let mut events = Events::new();

        run(&mut world, &mut events, false);

        let bounds: Vec<(Vec2, Vec2)> = entries
            .iter()
            .map(|(pos, shape, _)| shape.world_bounds(*pos))
            .collect();
        let mut brute = 0;
        for a in 0..entries.len() {
            for b in (a + 1)..entries.len() {
                if overlaps(&entries[a].1, entries[a].0, &entries[b].1, entries[b].0) {
                    brute += 1;
                }
            }
        }
        assert!(bounds.len() > BROAD_PHASE_THRESHOLD);
        assert_eq!(events.collision.len(), brute);
    }

    #[test]
    fn test_grid_pairs_sorted_and_unique() {
        let bounds = vec![
            (Vec2::ZERO, Vec2::new(100.0, 100.0)), // spans several cells
            (Vec2::new(10.0, 10.0), Vec2::new(90.0, 90.0)),
            (Vec2::new(500.0, 500.0), Vec2::new(501.0, 501.0)),
        ];
        let pairs = grid_pairs(&bounds);
        assert_eq!(pairs, vec![(0, 1)]); // shared cells collapse to one entry
    }
}
