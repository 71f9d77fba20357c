// waypath_core/src/planning/geometry.rs

use nalgebra::Vector2;

/// Below this, (x'^2 + y'^2)^1.5 is treated as a straight-line degenerate case.
const CURVATURE_DENOMINATOR_FLOOR: f64 = 1e-6;

/// Curvature magnitude |x'y'' - y'x''| / (x'^2 + y'^2)^1.5, in 1/m.
/// Returns exactly 0 when the denominator falls below the floor.
pub fn curvature(d1: &Vector2<f64>, d2: &Vector2<f64>) -> f64 {
    let denominator = d1.norm_squared().powf(1.5);
    if denominator < CURVATURE_DENOMINATOR_FLOOR {
        return 0.0;
    }
    (d1.x * d2.y - d1.y * d2.x).abs() / denominator
}

/// Tangent heading atan2(y', x') in degrees.
pub fn heading_deg(d1: &Vector2<f64>) -> f64 {
    d1.y.atan2(d1.x).to_degrees()
}
