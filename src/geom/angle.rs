//! Angle arithmetic for emission cones and reflections.
//!
//! All angles are radians in the atan2 convention, normalized into
//! (-pi, pi]. Angular ranges may wrap across the +/-pi boundary, so they
//! are represented as a start angle plus a signed sweep instead of a
//! (min, max) pair.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Wraps an angle into (-pi, pi].
pub fn normalize_angle(a: f64) -> f64 {
    a.sin().atan2(a.cos())
}

/// The opposite direction (a + pi, normalized).
pub fn reverse_angle(a: f64) -> f64 {
    normalize_angle(a + PI)
}

/// Law-of-reflection bounce of an incoming direction about a surface
/// normal direction.
pub fn reflect_angle(a: f64, normal_angle: f64) -> f64 {
    normalize_angle(2.0 * normal_angle - a - PI)
}

/// Returns true if a surface with the given normal direction faces away
/// from (or is edge-on to, within `eps`) a ray travelling along
/// `cast_angle`. A front-facing surface has its normal opposed to the
/// incoming direction.
pub fn is_back_facing(cast_angle: f64, normal_angle: f64, eps: f64) -> bool {
    (cast_angle - normal_angle).cos() >= -eps
}

/// An angular range from `start` sweeping by a signed `sweep`.
///
/// Built from a light source's endpoint emission angles; `sweep` is the
/// wrapped difference, so a range given as e.g. (170deg, -170deg) sweeps
/// 20 degrees across the +/-pi boundary rather than 340 degrees the long
/// way around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularSpan {
    pub start: f64,
    pub sweep: f64,
}

impl AngularSpan {
    /// Span from the emission angles at a segment's two endpoints.
    pub fn from_angles(p1_angle: f64, p2_angle: f64) -> Self {
        Self {
            start: normalize_angle(p1_angle),
            sweep: normalize_angle(p2_angle - p1_angle),
        }
    }

    /// Signed angular distance of `angle` from the span start, wrapped.
    ///
    /// For angles inside the span this has the same sign as `sweep` and a
    /// magnitude no larger than `|sweep|`.
    pub fn offset(&self, angle: f64) -> f64 {
        normalize_angle(angle - self.start)
    }

    /// True if `angle` lies within the span, with an angular tolerance at
    /// both boundaries.
    pub fn contains(&self, angle: f64, eps: f64) -> bool {
        let t = self.offset(angle);
        if self.sweep >= 0.0 {
            t >= -eps && t <= self.sweep + eps
        } else {
            t >= self.sweep - eps && t <= eps
        }
    }

    /// Monotone sort key along the sweep direction: 0 at the start
    /// boundary, increasing toward the end boundary regardless of sweep
    /// sign.
    pub fn sort_key(&self, angle: f64) -> f64 {
        self.offset(angle) * self.sweep.signum()
    }

    /// The direction splitting the span in half.
    pub fn midpoint(&self) -> f64 {
        normalize_angle(self.start + self.sweep / 2.0)
    }

    /// The end boundary direction.
    pub fn end(&self) -> f64 {
        normalize_angle(self.start + self.sweep)
    }
}
