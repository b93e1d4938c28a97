//! Line segment operations.
//!
//! Segments are undirected for intersection purposes, but the endpoint
//! order matters wherever emission angles are derived from them.

use serde::{Deserialize, Serialize};

use crate::geom::EPS;
use crate::{Point, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p1: Point,
    pub p2: Point,
}

impl LineSegment {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    pub fn midpoint(&self) -> Point {
        Point::new((self.p1.x + self.p2.x) / 2.0, (self.p1.y + self.p2.y) / 2.0)
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(&self.p2)
    }

    /// Displacement from p1 to p2 (not normalized).
    pub fn direction(&self) -> Vector {
        self.p2 - self.p1
    }

    /// Direction angle of p1 -> p2 in radians.
    pub fn direction_angle(&self) -> f64 {
        self.direction().angle()
    }

    /// Unit normal obtained by rotating the p1 -> p2 direction 90 degrees
    /// counterclockwise. None for a degenerate (zero-length) segment.
    pub fn left_normal(&self) -> Option<Vector> {
        self.direction().perpendicular().normalize()
    }

    /// Returns the shared corner if the two segments have endpoints within
    /// `eps` of each other. The returned point is taken from `other`, so
    /// swapping the arguments yields the same corner within tolerance.
    pub fn connection_point(&self, other: &Self, eps: f64) -> Option<Point> {
        for own in [self.p1, self.p2] {
            for theirs in [other.p1, other.p2] {
                if own.is_close_within(&theirs, eps) {
                    return Some(theirs);
                }
            }
        }
        None
    }

    /// True if both endpoints match pairwise (same order).
    pub fn is_close(&self, other: &Self) -> bool {
        self.p1.is_close_within(&other.p1, EPS) && self.p2.is_close_within(&other.p2, EPS)
    }
}
