pub mod angle;
pub mod point;
pub mod ray;
pub mod segment;
pub mod vector;

/// Geometric precision in coordinate-space units (pixels in the original
/// environments). Visually tuned, not physically derived.
pub const EPS: f64 = 1e-3;
