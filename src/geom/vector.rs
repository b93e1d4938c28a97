use crate::Point;
use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn from_points(beg: Point, end: Point) -> Self {
        Self {
            dx: end.x - beg.x,
            dy: end.y - beg.y,
        }
    }

    /// Unit vector pointing along an angle (radians, atan2 convention).
    pub fn from_angle(angle: f64) -> Self {
        Self {
            dx: angle.cos(),
            dy: angle.sin(),
        }
    }

    /// Dot product between 2 vectors.
    pub fn dot(self, other: Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy
    }

    /// 2D cross product (z component of the 3D cross, a scalar).
    ///
    /// Positive when `other` lies counterclockwise of `self`.
    pub fn perp_dot(self, other: Self) -> f64 {
        self.dx * other.dy - self.dy * other.dx
    }

    /// Returns the length of the vector.
    pub fn length(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2)).sqrt()
    }

    pub fn is_close(&self, other: &Self) -> bool {
        (self.dx - other.dx).abs() < EPS && (self.dy - other.dy).abs() < EPS
    }

    /// Normalizes the vector (divides by its length) and returns a copy.
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len < EPS {
            None
        } else {
            Some(Self {
                dx: self.dx / len,
                dy: self.dy / len,
            })
        }
    }

    /// The vector rotated 90 degrees counterclockwise.
    pub fn perpendicular(&self) -> Self {
        Self {
            dx: -self.dy,
            dy: self.dx,
        }
    }

    /// Direction of the vector in radians (atan2 convention, (-pi, pi]).
    pub fn angle(&self) -> f64 {
        self.dy.atan2(self.dx)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Vector({:.prec$}, {:.prec$})",
            self.dx,
            self.dy,
            prec = prec
        )
    }
}

// Implement +
impl Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
        }
    }
}

// Implement -
impl Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
        }
    }
}

// Implement *
impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, other: f64) -> Self {
        Self {
            dx: self.dx * other,
            dy: self.dy * other,
        }
    }
}

// Implement unary -
impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let p0 = Point::new(1., 1.);
        let p1 = Point::new(0., 0.);
        let va = Vector::from_points(p0, p1);
        let vb = Vector::from_points(p1, p0);
        assert_eq!(va, vb * -1.);
    }

    #[test]
    fn test_from_angle() {
        let v = Vector::from_angle(0.);
        assert!(v.is_close(&Vector::new(1., 0.)));
        let v = Vector::from_angle(std::f64::consts::FRAC_PI_2);
        assert!(v.is_close(&Vector::new(0., 1.)));
    }

    #[test]
    fn test_angle_roundtrip() {
        for a in [-2.5, -1.0, 0.0, 0.7, 1.9, 3.0] {
            let v = Vector::from_angle(a);
            assert!(
                (v.angle() - a).abs() < 1e-10,
                "angle roundtrip failed for {a}"
            );
        }
    }

    #[test]
    fn test_perp_dot() {
        let vx = Vector::new(1., 0.);
        let vy = Vector::new(0., 1.);
        assert_eq!(vx.perp_dot(vy), 1.);
        assert_eq!(vy.perp_dot(vx), -1.);
        assert_eq!(vx.perp_dot(vx), 0.);
    }

    #[test]
    fn test_perpendicular() {
        let v = Vector::new(1., 0.).perpendicular();
        assert!(v.is_close(&Vector::new(0., 1.)));
        let v = Vector::new(0., 1.).perpendicular();
        assert!(v.is_close(&Vector::new(-1., 0.)));
    }

    #[test]
    fn test_normalize() {
        // Non-zero-length vector
        let v = Vector::new(9., 0.);
        let vnorm = v.normalize();
        assert!(vnorm.is_some());
        assert_eq!(vnorm.unwrap(), Vector::new(1., 0.));
        // Zero-length vector
        let v = Vector::new(0., 0.);
        assert!(v.normalize().is_none());
    }

    #[test]
    fn test_dot() {
        let va = Vector::new(2., 1.);
        let vb = Vector::new(3., -2.);
        assert_eq!(va.dot(vb), 4.);
    }
}
