//! Linear distance falloff.
//!
//! Intensity decays linearly with travelled distance and reaches zero
//! at a hard cutoff range. Results are clamped into `[0, 1]`.

use serde::{Deserialize, Serialize};

/// Linear falloff with a hard cutoff range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Falloff {
    /// Distance at which intensity reaches zero.
    pub max_range: f64,
}

impl Falloff {
    pub fn new(max_range: f64) -> Self {
        Self { max_range }
    }

    /// Attenuates a base intensity by travelled distance.
    ///
    /// Non-positive distances leave the base unattenuated; distances at
    /// or beyond the cutoff range yield zero.
    pub fn apply(&self, base: f64, distance: f64) -> f64 {
        if distance <= 0.0 {
            return base.clamp(0.0, 1.0);
        }
        if self.max_range <= 0.0 {
            return 0.0;
        }
        let d = distance.min(self.max_range);
        (base * (1.0 - d / self.max_range)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_returns_base() {
        let falloff = Falloff::new(650.0);
        assert_eq!(falloff.apply(0.8, 0.0), 0.8);
        assert_eq!(falloff.apply(0.8, -5.0), 0.8);
    }

    #[test]
    fn test_cutoff_range_reaches_zero() {
        let falloff = Falloff::new(650.0);
        assert_eq!(falloff.apply(1.0, 650.0), 0.0);
        assert_eq!(falloff.apply(1.0, 10_000.0), 0.0);
    }

    #[test]
    fn test_monotone_in_distance() {
        let falloff = Falloff::new(650.0);
        let mut prev = falloff.apply(1.0, 0.0);
        for i in 1..=10 {
            let value = falloff.apply(1.0, 65.0 * i as f64);
            assert!(
                value <= prev,
                "intensity grew from {prev} to {value} at step {i}"
            );
            prev = value;
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let falloff = Falloff::new(100.0);
        assert!((falloff.apply(1.0, 50.0) - 0.5).abs() < 1e-12);
        assert!((falloff.apply(0.5, 50.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_result_clamped() {
        let falloff = Falloff::new(100.0);
        assert_eq!(falloff.apply(5.0, 0.0), 1.0);
        assert_eq!(falloff.apply(-1.0, 10.0), 0.0);
    }

    #[test]
    fn test_degenerate_range() {
        let falloff = Falloff::new(0.0);
        assert_eq!(falloff.apply(1.0, 1.0), 0.0);
        assert_eq!(falloff.apply(1.0, 0.0), 1.0);
    }
}
