use crate::Vector;
use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both points are very close to each other.
    pub fn is_close(&self, other: &Self) -> bool {
        self.is_close_within(other, EPS)
    }

    /// Same as `is_close` but with an explicit coordinate tolerance.
    pub fn is_close_within(&self, other: &Self, eps: f64) -> bool {
        (self.x - other.x).abs() < eps && (self.y - other.y).abs() < eps
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(f, "Point({:.prec$}, {:.prec$})", self.x, self.y, prec = prec)
    }
}

// Implement +
impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, other: Vector) -> Self {
        Self {
            x: self.x + other.dx,
            y: self.y + other.dy,
        }
    }
}

// Implement - (difference of two points is the vector between them)
impl Sub<Point> for Point {
    type Output = Vector;
    fn sub(self, other: Point) -> Vector {
        Vector {
            dx: self.x - other.x,
            dy: self.y - other.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close() {
        let pa = Point::new(5., 5.);
        let pb = Point::new(5.00001, 5.);
        let pc = Point::new(5.1, 5.);
        assert!(pa.is_close(&pb));
        assert!(!pa.is_close(&pc));
        assert!(pa.is_close(&pa));
    }

    #[test]
    fn test_is_close_within() {
        let pa = Point::new(0., 0.);
        let pb = Point::new(0.05, -0.05);
        assert!(pa.is_close_within(&pb, 0.1));
        assert!(!pa.is_close_within(&pb, 0.01));
    }

    #[test]
    fn test_distance() {
        let pa = Point::new(0., 0.);
        let pb = Point::new(3., 4.);
        assert!((pa.distance(&pb) - 5.).abs() < 1e-10);
        assert!(pa.distance(&pa).abs() < 1e-10);
    }

    #[test]
    fn test_add_vector() {
        let p = Point::new(1., 2.) + Vector::new(0.5, -1.);
        assert!(p.is_close(&Point::new(1.5, 1.)));
    }

    #[test]
    fn test_sub_points() {
        let v = Point::new(3., 4.) - Point::new(1., 1.);
        assert!(v.is_close(&Vector::new(2., 3.)));
    }
}
