// waypath_core/src/utils/angles.rs

//! Degree-based angle helpers. All headings in the crate are degrees.

/// Wraps any angle into (-180, 180].
pub fn normalize_angle_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
pub fn shortest_angle_diff_deg(from: f64, to: f64) -> f64 {
    normalize_angle_deg(to - from)
}

/// Interpolates between two headings along the shorter arc.
/// `t` = 0 yields `from`, `t` = 1 yields `to` (both wrapped).
pub fn interpolate_angle_deg(from: f64, to: f64, t: f64) -> f64 {
    normalize_angle_deg(from + shortest_angle_diff_deg(from, to) * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_normalize_keeps_upper_bound() {
        assert_abs_diff_eq!(normalize_angle_deg(180.0), 180.0, epsilon = EPSILON);
        assert_abs_diff_eq!(normalize_angle_deg(-180.0), 180.0, epsilon = EPSILON);
        assert_abs_diff_eq!(normalize_angle_deg(190.0), -170.0, epsilon = EPSILON);
        assert_abs_diff_eq!(normalize_angle_deg(-725.0), -5.0, epsilon = EPSILON);
        assert_abs_diff_eq!(normalize_angle_deg(0.0), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_interpolation_crosses_seam() {
        // The short way from 170 to -170 passes through 180, not 0.
        assert_abs_diff_eq!(interpolate_angle_deg(170.0, -170.0, 0.5), 180.0, epsilon = EPSILON);
        assert_abs_diff_eq!(interpolate_angle_deg(-170.0, 170.0, 0.25), -175.0, epsilon = EPSILON);
    }

    #[test]
    fn test_interpolation_endpoints() {
        assert_abs_diff_eq!(interpolate_angle_deg(0.0, 90.0, 0.0), 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(interpolate_angle_deg(0.0, 90.0, 1.0), 90.0, epsilon = EPSILON);
        assert_abs_diff_eq!(interpolate_angle_deg(0.0, 90.0, 0.5), 45.0, epsilon = EPSILON);
    }

    #[test]
    fn test_shortest_diff_sign() {
        assert_abs_diff_eq!(shortest_angle_diff_deg(350.0, 10.0), 20.0, epsilon = EPSILON);
        assert_abs_diff_eq!(shortest_angle_diff_deg(10.0, 350.0), -20.0, epsilon = EPSILON);
    }
}
