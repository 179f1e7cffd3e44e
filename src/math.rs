//! Vector math for the 2D simulation
//!
//! Plain value types, compared and combined by value. The integrator
//! never clamps or sanitizes: NaN or infinity in means NaN or infinity
//! out, so peers stay bit-identical instead of silently diverging.

use std::ops::{Add, Sub, Mul, Neg};
use serde::{Serialize, Deserialize};

/// 2D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const X: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    pub const Y: Vec2 = Vec2 { x: 0.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product of the two vectors
    /// lifted into the plane. Sign tells winding.
    pub fn perp_dot(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn len_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn len(self) -> f32 {
        self.len_sq().sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).len()
    }

    pub fn normalize(self) -> Vec2 {
        let l = self.len();
        if l == 0.0 {
            return Vec2::ZERO;
        }
        Vec2 {
            x: self.x / l,
            y: self.y / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }

    /// Reflect about a unit-length normal: v - 2(v.n)n
    pub fn reflect(self, normal: Vec2) -> Vec2 {
        self - normal.scale(2.0 * self.dot(normal))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        self.scale(s)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, -2.0);

        assert_eq!(a + b, Vec2::new(4.0, 2.0));
        assert_eq!(a - b, Vec2::new(2.0, 6.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, 8.0));
        assert_eq!(-b, Vec2::new(-1.0, 2.0));
    }

    #[test]
    fn test_len_and_dot() {
        let v = Vec2::new(3.0, 4.0);
        assert!((v.len() - 5.0).abs() < 0.0001);
        assert!((v.len_sq() - 25.0).abs() < 0.0001);
        assert!((v.dot(Vec2::new(2.0, 1.0)) - 10.0).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);

        let n = Vec2::new(0.0, 10.0).normalize();
        assert!((n.len() - 1.0).abs() < 0.0001);
        assert_eq!(n, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_reflect() {
        // Falling onto a floor with +Y normal flips the y component
        let v = Vec2::new(3.0, -4.0);
        let r = v.reflect(Vec2::Y);
        assert!((r.x - 3.0).abs() < 0.0001);
        assert!((r.y - 4.0).abs() < 0.0001);
    }
}
