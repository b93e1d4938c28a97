//! Ray casting infrastructure.
//!
//! Rays carry both their cast angle and the unit direction derived from
//! it, since the tracer bookkeeps angles while the intersection math
//! wants vectors.

use crate::geom::angle::normalize_angle;
use crate::{LineSegment, Point, Vector};

/// A half-line from an origin along a cast angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray
    pub origin: Point,
    /// Cast angle in radians, normalized into (-pi, pi]
    pub angle: f64,
    direction: Vector,
}

impl Ray {
    /// Creates a new ray from an origin and a cast angle.
    pub fn new(origin: Point, angle: f64) -> Self {
        let angle = normalize_angle(angle);
        Self {
            origin,
            angle,
            direction: Vector::from_angle(angle),
        }
    }

    /// Creates a ray from the origin aimed through a target point.
    ///
    /// Returns None when the points coincide (no defined direction).
    pub fn from_points(origin: Point, target: Point) -> Option<Self> {
        if origin.is_close(&target) {
            return None;
        }
        Some(Self::new(origin, (target - origin).angle()))
    }

    /// Unit direction vector of the ray.
    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// Returns the point along the ray at parameter t.
    ///
    /// point = origin + t * direction
    pub fn point_at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    /// Intersects the ray with a segment using the perpendicular dot
    /// product method.
    ///
    /// Returns `Some((t, point))` where `t` is the distance along the
    /// ray. Requires `t > eps` (strictly in front of the origin) and the
    /// segment parameter within [0, 1]. Near-parallel configurations
    /// (|perp dot| <= eps) return None.
    pub fn intersect_segment(&self, segment: &LineSegment, eps: f64) -> Option<(f64, Point)> {
        let seg_dir = segment.direction();
        let perp_dot = self.direction.perp_dot(seg_dir);
        if perp_dot.abs() <= eps {
            return None;
        }

        let delta = segment.p1 - self.origin;
        let t = (seg_dir.dy * delta.dx - seg_dir.dx * delta.dy) / perp_dot;
        let s = (self.direction.dy * delta.dx - self.direction.dx * delta.dy) / perp_dot;

        if t > eps && (0.0..=1.0).contains(&s) {
            Some((t, self.point_at(t)))
        } else {
            None
        }
    }

    /// Intersects two rays, requiring the crossing to lie forward along
    /// both (parameters >= 0). Rays with coincident origins meet at that
    /// origin. Parallel rays return None.
    pub fn intersect_ray(&self, other: &Ray, eps: f64) -> Option<Point> {
        if self.origin.is_close_within(&other.origin, eps) {
            return Some(self.origin);
        }

        let cross = other.direction.perp_dot(self.direction);
        if cross.abs() <= eps {
            return None;
        }

        let delta = other.origin - self.origin;
        let u = (delta.dy * other.direction.dx - delta.dx * other.direction.dy) / cross;
        let v = (delta.dy * self.direction.dx - delta.dx * self.direction.dy) / cross;

        if u >= 0.0 && v >= 0.0 {
            Some(self.point_at(u))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-3;

    #[test]
    fn test_point_at() {
        let ray = Ray::new(Point::new(1.0, 1.0), 0.0);
        assert!(ray.point_at(2.0).is_close(&Point::new(3.0, 1.0)));
    }

    #[test]
    fn test_from_points() {
        let ray = Ray::from_points(Point::new(0.0, 0.0), Point::new(0.0, 5.0)).unwrap();
        assert!((ray.angle - FRAC_PI_2).abs() < 1e-12);
        assert!(Ray::from_points(Point::new(1.0, 1.0), Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_intersect_segment_hit() {
        let ray = Ray::new(Point::new(0.0, 0.0), 0.0);
        let seg = LineSegment::new(Point::new(5.0, -1.0), Point::new(5.0, 1.0));
        let (t, p) = ray.intersect_segment(&seg, EPS).unwrap();
        assert!((t - 5.0).abs() < 1e-9);
        assert!(p.is_close(&Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_intersect_segment_parallel() {
        let ray = Ray::new(Point::new(0.0, 0.0), 0.0);
        let seg = LineSegment::new(Point::new(0.0, 1.0), Point::new(10.0, 1.0));
        assert!(ray.intersect_segment(&seg, EPS).is_none());
    }

    #[test]
    fn test_intersect_segment_behind() {
        let ray = Ray::new(Point::new(0.0, 0.0), 0.0);
        let seg = LineSegment::new(Point::new(-5.0, -1.0), Point::new(-5.0, 1.0));
        assert!(ray.intersect_segment(&seg, EPS).is_none());
    }

    #[test]
    fn test_intersect_segment_misses_sideways() {
        let ray = Ray::new(Point::new(0.0, 0.0), 0.0);
        let seg = LineSegment::new(Point::new(5.0, 1.0), Point::new(5.0, 3.0));
        assert!(ray.intersect_segment(&seg, EPS).is_none());
    }

    #[test]
    fn test_intersect_segment_at_endpoint() {
        // Segment parameter s = 0 and s = 1 both count as hits.
        let ray = Ray::new(Point::new(0.0, 0.0), 0.0);
        let seg = LineSegment::new(Point::new(5.0, 0.0), Point::new(5.0, 2.0));
        let (t, p) = ray.intersect_segment(&seg, EPS).unwrap();
        assert!((t - 5.0).abs() < 1e-9);
        assert!(p.is_close(&Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_intersect_ray_converging() {
        let r1 = Ray::new(Point::new(0.0, 0.0), 0.0);
        let r2 = Ray::new(Point::new(4.0, 2.0), -FRAC_PI_2);
        let p = r1.intersect_ray(&r2, EPS).unwrap();
        assert!(p.is_close(&Point::new(4.0, 0.0)));
    }

    #[test]
    fn test_intersect_ray_diverging() {
        let r1 = Ray::new(Point::new(0.0, 0.0), 0.0);
        let r2 = Ray::new(Point::new(4.0, 2.0), FRAC_PI_2);
        assert!(r1.intersect_ray(&r2, EPS).is_none());
    }

    #[test]
    fn test_intersect_ray_parallel() {
        let r1 = Ray::new(Point::new(0.0, 0.0), 0.0);
        let r2 = Ray::new(Point::new(0.0, 2.0), 0.0);
        assert!(r1.intersect_ray(&r2, EPS).is_none());
    }

    #[test]
    fn test_intersect_ray_same_origin() {
        let r1 = Ray::new(Point::new(3.0, 3.0), 0.0);
        let r2 = Ray::new(Point::new(3.0, 3.0), PI);
        let p = r1.intersect_ray(&r2, EPS).unwrap();
        assert!(p.is_close(&Point::new(3.0, 3.0)));
    }
}
