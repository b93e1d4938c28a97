use serde::{Deserialize, Serialize};

use crate::geom::EPS;

/// Configuration for the visibility tracer.
///
/// All distances are in coordinate-space units (pixels in the original
/// environments); the defaults are visually tuned, not physically
/// derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Geometric tolerance: point coincidence, parallel rejection,
    /// forward-ray cutoff and the back-facing margin. Default 1e-3.
    pub epsilon: f64,
    /// Distance at which light fades to zero. Default 650.0.
    pub falloff_range: f64,
    /// Sources dimmer than this are extinguished and never traced or
    /// emitted. Default 1e-3.
    pub min_intensity: f64,
    /// Maximum bisection depth when reconciling disjoint adjacent hits.
    /// Default 16.
    pub max_bisections: usize,
    /// Budget of hit re-insertions per traced source; reconciliation
    /// degrades to plain seams once spent. Default 64.
    pub max_corrections: usize,
    /// Collect per-ray diagnostic segments into the result. Ray counting
    /// is unconditional; this only gates the segment list. Default off.
    pub collect_rays: bool,
}

impl TraceConfig {
    pub fn new() -> Self {
        Self {
            epsilon: EPS,
            falloff_range: 650.0,
            min_intensity: 1e-3,
            max_bisections: 16,
            max_corrections: 64,
            collect_rays: false,
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TraceConfig::new();
        assert_eq!(config.epsilon, 1e-3);
        assert_eq!(config.falloff_range, 650.0);
        assert!(!config.collect_rays);
        assert!(config.max_bisections > 0);
        assert!(config.max_corrections > 0);
    }
}
