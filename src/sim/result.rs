//! Trace output types.
//!
//! A single traced light source produces a [`TraceResult`]: the lit
//! polygon it illuminates, the secondary sources it spawns, and ray
//! diagnostics. The driver merges per-source results into one
//! [`TraceResult`] per bounce generation and stacks the generations in
//! a [`TraceOutput`].

use serde::{Deserialize, Serialize};

use crate::geom::point::Point;
use crate::geom::segment::LineSegment;
use crate::sim::sources::LightSource;

/// A confirmed ray-surface intersection, as seen from the source apex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Where the ray was cast from.
    pub origin: Point,
    /// Where it landed.
    pub location: Point,
    /// Direction of the cast, radians.
    pub cast_angle: f64,
    /// Cast direction reflected about the hit surface's normal.
    pub bounce_angle: f64,
    /// Travelled distance from the source apex to the location.
    pub distance: f64,
    /// Surface that was hit.
    pub surface_id: usize,
}

/// A point with a known intensity, anchoring a rendering gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityAnchor {
    pub location: Point,
    pub value: f64,
}

/// A closed illuminated region.
///
/// `points` is an ordered loop: the source's own endpoints plus the
/// swept hit and correction vertices between them. The two anchors give
/// renderers the brightest and dimmest points of the region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitPolygon {
    pub points: Vec<Point>,
    pub max_intensity: IntensityAnchor,
    pub min_intensity: IntensityAnchor,
}

/// Everything produced by tracing one generation of light sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// One polygon per source that illuminated anything.
    pub lit_polygons: Vec<LitPolygon>,
    /// Secondary sources spawned by surface bounces, ready for the next
    /// generation.
    pub light_sources: Vec<LightSource>,
    /// Diagnostic ray segments, collected only when the config asks.
    pub visible_rays: Vec<LineSegment>,
    /// Number of rays cast, including confirmation and correction casts.
    pub total_rays: usize,
}

impl TraceResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds another result into this one, preserving order.
    pub fn merge(&mut self, other: TraceResult) {
        self.lit_polygons.extend(other.lit_polygons);
        self.light_sources.extend(other.light_sources);
        self.visible_rays.extend(other.visible_rays);
        self.total_rays += other.total_rays;
    }
}

/// Results of a full multi-bounce trace, one entry per generation.
///
/// Generation 0 holds the primary sources' output; generation `n` holds
/// the output of the sources spawned by generation `n - 1`. Renderers
/// that color bounces differently can address generations individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceOutput {
    pub generations: Vec<TraceResult>,
}

impl TraceOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// All lit polygons in generation order.
    pub fn lit_polygons(&self) -> impl Iterator<Item = &LitPolygon> {
        self.generations.iter().flat_map(|g| g.lit_polygons.iter())
    }

    /// All diagnostic rays in generation order.
    pub fn visible_rays(&self) -> impl Iterator<Item = &LineSegment> {
        self.generations.iter().flat_map(|g| g.visible_rays.iter())
    }

    /// Total rays cast across all generations.
    pub fn total_rays(&self) -> usize {
        self.generations.iter().map(|g| g.total_rays).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_polygon() -> LitPolygon {
        LitPolygon {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(0.0, 1.0),
            ],
            max_intensity: IntensityAnchor {
                location: Point::new(0.0, 0.0),
                value: 1.0,
            },
            min_intensity: IntensityAnchor {
                location: Point::new(1.0, 0.0),
                value: 0.2,
            },
        }
    }

    #[test]
    fn test_merge_accumulates() {
        let mut a = TraceResult {
            lit_polygons: vec![sample_polygon()],
            total_rays: 3,
            ..TraceResult::default()
        };
        let b = TraceResult {
            lit_polygons: vec![sample_polygon(), sample_polygon()],
            total_rays: 5,
            ..TraceResult::default()
        };
        a.merge(b);
        assert_eq!(a.lit_polygons.len(), 3);
        assert_eq!(a.total_rays, 8);
    }

    #[test]
    fn test_output_accessors() {
        let mut output = TraceOutput::new();
        output.generations.push(TraceResult {
            lit_polygons: vec![sample_polygon()],
            total_rays: 10,
            ..TraceResult::default()
        });
        output.generations.push(TraceResult {
            lit_polygons: vec![sample_polygon(), sample_polygon()],
            total_rays: 4,
            ..TraceResult::default()
        });
        assert_eq!(output.num_generations(), 2);
        assert_eq!(output.lit_polygons().count(), 3);
        assert_eq!(output.total_rays(), 14);
    }

    #[test]
    fn test_polygon_serializes() {
        let json = serde_json::to_string(&sample_polygon()).unwrap();
        assert!(json.contains("\"points\""), "unexpected JSON: {json}");
        let back: LitPolygon = serde_json::from_str(&json).unwrap();
        assert_eq!(back.points.len(), 3);
    }
}
