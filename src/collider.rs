//! Collider Shapes and Responses
//!
//! A collider is "what shape, where, and what happens on overlap".
//! Shapes are a closed enum rather than trait objects: the pair
//! dispatch below is one exhaustive `match`, so forgetting a test for
//! a new shape pair is a compile error, not a runtime surprise in the
//! middle of a tick.
//!
//! Shape offsets are entity-local and added to the owning entity's
//! transform position at test time. Offsets do not rotate with the
//! entity: hulls and tiles are axis-aligned sprites.

use serde::{Serialize, Deserialize};
use crate::math::Vec2;

/// Two world-space points closer than this count as touching.
/// Needed because integrated positions land near, never exactly on,
/// each other.
pub const CONTACT_EPSILON: f32 = 1e-4;

/// Geometry of a collider, in entity-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// A single point (shell tips, pickups)
    Point { offset: Vec2 },
    /// Circle around `offset` (turrets, blast radii)
    Circle { offset: Vec2, radius: f32 },
    /// Axis-aligned box around `offset` (hulls, tiles)
    Aabb { offset: Vec2, half_extents: Vec2 },
}

impl ColliderShape {
    /// Point at the entity origin.
    pub fn point() -> Self {
        ColliderShape::Point { offset: Vec2::ZERO }
    }

    pub fn point_at(offset: Vec2) -> Self {
        ColliderShape::Point { offset }
    }

    /// Circle centered on the entity origin.
    pub fn circle(radius: f32) -> Self {
        ColliderShape::Circle {
            offset: Vec2::ZERO,
            radius,
        }
    }

    /// Box centered on the entity origin.
    pub fn aabb(half_extents: Vec2) -> Self {
        ColliderShape::Aabb {
            offset: Vec2::ZERO,
            half_extents,
        }
    }

    /// World-space center given the owning entity's position.
    pub fn world_center(&self, entity_pos: Vec2) -> Vec2 {
        match self {
            ColliderShape::Point { offset }
            | ColliderShape::Circle { offset, .. }
            | ColliderShape::Aabb { offset, .. } => entity_pos + *offset,
        }
    }

    /// Conservative world-space bounds (min, max), used by the broad
    /// phase to bucket colliders into grid cells.
    pub fn world_bounds(&self, entity_pos: Vec2) -> (Vec2, Vec2) {
        let center = self.world_center(entity_pos);
        match self {
            ColliderShape::Point { .. } => (center, center),
            ColliderShape::Circle { radius, .. } => {
                let r = Vec2::new(*radius, *radius);
                (center - r, center + r)
            }
            ColliderShape::Aabb { half_extents, .. } => (center - *half_extents, center + *half_extents),
        }
    }
}

/// What happens to an entity when its collider overlaps another.
///
/// Attached at construction and immutable afterward. There is no
/// `Default` on purpose: every collider states its policy explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionResponse {
    /// Detect and report, change nothing
    Ignore,
    /// Undo this tick's movement and stop
    Block,
    /// Remove the entity from the world
    Destroy,
    /// Reflect velocity about the contact normal
    Bounce,
}

/// Shape plus response policy. Owned by exactly one entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub shape: ColliderShape,
    pub response: CollisionResponse,
}

impl Collider {
    pub fn new(shape: ColliderShape, response: CollisionResponse) -> Self {
        Self { shape, response }
    }
}

// Equality is geometry only: two colliders at the same point are the
// same contact regardless of how each side reacts to it.
impl PartialEq for Collider {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
    }
}

// =============================================================================
// Pairwise overlap tests
// =============================================================================

/// Do two colliders overlap, given their owners' world positions?
///
/// Every test is closed-form. Mirrored pairs delegate to the one
/// implementation with arguments swapped, so (A,B) and (B,A) can never
/// disagree.
pub fn overlaps(a: &ColliderShape, a_pos: Vec2, b: &ColliderShape, b_pos: Vec2) -> bool {
    use ColliderShape::*;
    let ca = a.world_center(a_pos);
    let cb = b.world_center(b_pos);

    match (a, b) {
        (Point { .. }, Point { .. }) => ca.distance(cb) <= CONTACT_EPSILON,

        (Point { .. }, Circle { radius, .. }) => point_in_circle(ca, cb, *radius),
        (Circle { radius, .. }, Point { .. }) => point_in_circle(cb, ca, *radius),

        (Point { .. }, Aabb { half_extents, .. }) => point_in_aabb(ca, cb, *half_extents),
        (Aabb { half_extents, .. }, Point { .. }) => point_in_aabb(cb, ca, *half_extents),

        (Circle { radius: ra, .. }, Circle { radius: rb, .. }) => {
            let reach = ra + rb;
            (ca - cb).len_sq() <= reach * reach
        }

        (Circle { radius, .. }, Aabb { half_extents, .. }) => {
            circle_hits_aabb(ca, *radius, cb, *half_extents)
        }
        (Aabb { half_extents, .. }, Circle { radius, .. }) => {
            circle_hits_aabb(cb, *radius, ca, *half_extents)
        }

        (Aabb { half_extents: ha, .. }, Aabb { half_extents: hb, .. }) => {
            (ca.x - cb.x).abs() <= ha.x + hb.x && (ca.y - cb.y).abs() <= ha.y + hb.y
        }
    }
}

fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    (p - center).len_sq() <= radius * radius
}

fn point_in_aabb(p: Vec2, center: Vec2, half: Vec2) -> bool {
    (p.x - center.x).abs() <= half.x && (p.y - center.y).abs() <= half.y
}

fn circle_hits_aabb(circle: Vec2, radius: f32, center: Vec2, half: Vec2) -> bool {
    // Closest point on the box to the circle center
    let closest = clamp_to_aabb(circle, center, half);
    (circle - closest).len_sq() <= radius * radius
}

fn clamp_to_aabb(p: Vec2, center: Vec2, half: Vec2) -> Vec2 {
    Vec2::new(
        p.x.clamp(center.x - half.x, center.x + half.x),
        p.y.clamp(center.y - half.y, center.y + half.y),
    )
}

// =============================================================================
// Contact normals
// =============================================================================

/// Unit normal at the contact, pointing from `b` toward `a`.
///
/// This is the surface a Bounce response on `a` reflects its velocity
/// about. Coincident centers fall back to +X so reflection is always
/// defined.
pub fn contact_normal(a: &ColliderShape, a_pos: Vec2, b: &ColliderShape, b_pos: Vec2) -> Vec2 {
    use ColliderShape::*;
    let ca = a.world_center(a_pos);
    let cb = b.world_center(b_pos);

    match (a, b) {
        // Box against box: push out along the axis of least penetration
        (Aabb { half_extents: ha, .. }, Aabb { half_extents: hb, .. }) => {
            aabb_separation_axis(ca, *ha, cb, *hb)
        }

        // Round-ish thing against a box: away from the closest point on
        // the box surface (least-penetration axis if fully inside)
        (Point { .. } | Circle { .. }, Aabb { half_extents, .. }) => {
            normal_from_aabb(ca, cb, *half_extents)
        }
        (Aabb { half_extents, .. }, Point { .. } | Circle { .. }) => {
            -normal_from_aabb(cb, ca, *half_extents)
        }

        // Center difference covers every remaining round pair
        _ => fallback_normal(ca - cb),
    }
}

fn fallback_normal(d: Vec2) -> Vec2 {
    if d.len_sq() == 0.0 {
        Vec2::X
    } else {
        d.normalize()
    }
}

fn normal_from_aabb(p: Vec2, center: Vec2, half: Vec2) -> Vec2 {
    let closest = clamp_to_aabb(p, center, half);
    if (p - closest).len_sq() > 0.0 {
        return (p - closest).normalize();
    }
    // Center is inside the box
    aabb_separation_axis(p, Vec2::ZERO, center, half)
}

fn aabb_separation_axis(ca: Vec2, ha: Vec2, cb: Vec2, hb: Vec2) -> Vec2 {
    let d = ca - cb;
    let pen_x = (ha.x + hb.x) - d.x.abs();
    let pen_y = (ha.y + hb.y) - d.y.abs();

    if pen_x <= pen_y {
        Vec2::new(if d.x >= 0.0 { 1.0 } else { -1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if d.y >= 0.0 { 1.0 } else { -1.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_equality_is_geometry_only() {
        let a = Collider::new(ColliderShape::point_at(Vec2::new(1.0, 1.0)), CollisionResponse::Block);
        let b = Collider::new(ColliderShape::point_at(Vec2::new(1.0, 1.0)), CollisionResponse::Destroy);
        let c = Collider::new(ColliderShape::point_at(Vec2::new(2.0, 1.0)), CollisionResponse::Block);

        assert_eq!(a, b); // response does not affect identity
        assert_ne!(a, c);
    }

    #[test]
    fn test_point_point_epsilon() {
        let p = ColliderShape::point();
        assert!(overlaps(&p, Vec2::new(5.0, 5.0), &p, Vec2::new(5.0, 5.0)));
        assert!(overlaps(&p, Vec2::new(5.0, 5.0), &p, Vec2::new(5.0 + CONTACT_EPSILON * 0.5, 5.0)));
        assert!(!overlaps(&p, Vec2::new(5.0, 5.0), &p, Vec2::new(5.1, 5.0)));
    }

    #[test]
    fn test_point_offset_is_entity_local() {
        let tip = ColliderShape::point_at(Vec2::new(4.0, 0.0));
        let wall = ColliderShape::aabb(Vec2::new(1.0, 1.0));

        // Entity at x=5, tip offset +4 -> tip at x=9; wall spans 9..11
        assert!(overlaps(&tip, Vec2::new(5.0, 0.0), &wall, Vec2::new(10.0, 0.0)));
        assert!(!overlaps(&tip, Vec2::new(3.0, 0.0), &wall, Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_circle_circle() {
        let a = ColliderShape::circle(2.0);
        let b = ColliderShape::circle(1.0);
        assert!(overlaps(&a, Vec2::ZERO, &b, Vec2::new(3.0, 0.0))); // touching
        assert!(!overlaps(&a, Vec2::ZERO, &b, Vec2::new(3.01, 0.0)));
    }

    #[test]
    fn test_circle_aabb_corner() {
        let c = ColliderShape::circle(1.0);
        let box_ = ColliderShape::aabb(Vec2::new(1.0, 1.0));

        // Circle diagonal to the corner at (1,1): closest gap is sqrt(2*0.09)
        assert!(overlaps(&c, Vec2::new(1.6, 1.6), &box_, Vec2::ZERO));
        // Too far along the diagonal
        assert!(!overlaps(&c, Vec2::new(1.8, 1.8), &box_, Vec2::ZERO));
    }

    #[test]
    fn test_aabb_aabb() {
        let a = ColliderShape::aabb(Vec2::new(2.0, 1.0));
        let b = ColliderShape::aabb(Vec2::new(1.0, 1.0));
        assert!(overlaps(&a, Vec2::ZERO, &b, Vec2::new(3.0, 0.0))); // edge contact
        assert!(!overlaps(&a, Vec2::ZERO, &b, Vec2::new(3.1, 0.0)));
        assert!(!overlaps(&a, Vec2::ZERO, &b, Vec2::new(0.0, 2.1)));
    }

    #[test]
    fn test_symmetry_across_all_pairs() {
        let shapes = [
            ColliderShape::point(),
            ColliderShape::circle(1.5),
            ColliderShape::aabb(Vec2::new(1.0, 2.0)),
        ];
        let positions = [Vec2::ZERO, Vec2::new(1.2, 0.4), Vec2::new(-0.6, 1.9)];

        for sa in &shapes {
            for sb in &shapes {
                for &pa in &positions {
                    for &pb in &positions {
                        assert_eq!(
                            overlaps(sa, pa, sb, pb),
                            overlaps(sb, pb, sa, pa),
                            "asymmetric result for {:?}@{:?} vs {:?}@{:?}",
                            sa, pa, sb, pb
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_contact_normal_points_from_b_to_a() {
        let a = ColliderShape::circle(1.0);
        let b = ColliderShape::circle(1.0);
        let n = contact_normal(&a, Vec2::new(1.5, 0.0), &b, Vec2::ZERO);
        assert!((n.x - 1.0).abs() < 0.0001);
        assert!(n.y.abs() < 0.0001);
    }

    #[test]
    fn test_contact_normal_coincident_fallback() {
        let p = ColliderShape::point();
        let n = contact_normal(&p, Vec2::ZERO, &p, Vec2::ZERO);
        assert_eq!(n, Vec2::X);
    }

    #[test]
    fn test_aabb_normal_least_penetration() {
        let a = ColliderShape::aabb(Vec2::new(1.0, 1.0));
        let b = ColliderShape::aabb(Vec2::new(1.0, 1.0));

        // Mostly overlapping horizontally, barely vertically: shortest
        // way out is vertical
        let n = contact_normal(&a, Vec2::new(0.2, 1.8), &b, Vec2::ZERO);
        assert_eq!(n, Vec2::new(0.0, 1.0));

        // And the mirror case
        let n = contact_normal(&a, Vec2::new(1.8, 0.2), &b, Vec2::ZERO);
        assert_eq!(n, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_world_bounds() {
        let c = ColliderShape::Circle { offset: Vec2::new(1.0, 0.0), radius: 2.0 };
        let (min, max) = c.world_bounds(Vec2::new(10.0, 10.0));
        assert_eq!(min, Vec2::new(9.0, 8.0));
        assert_eq!(max, Vec2::new(13.0, 12.0));
    }
}
