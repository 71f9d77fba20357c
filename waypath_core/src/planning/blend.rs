// waypath_core/src/planning/blend.rs

//! Pulls the hard-waypoint polyline toward nearby guide points before the
//! spline is fitted.

use nalgebra::Point2;

use crate::types::Waypoint;

/// A guide point that was found close enough to one polyline segment.
struct Attraction {
    /// Projection parameter along the segment, in [0, 1].
    t: f64,
    point: Point2<f64>,
}

/// Builds the control polyline the spline is fitted through.
///
/// `hard` keeps its order; `guides` may come in any order. Each guide is
/// projected onto every segment and only pulls on segments it is near to.
/// Consecutive exact duplicates are dropped from the output.
pub fn blend_guide_points(
    hard: &[&Waypoint],
    guides: &[&Waypoint],
    default_influence: f64,
) -> Vec<Point2<f64>> {
    let mut polyline: Vec<Point2<f64>> = Vec::with_capacity(hard.len() * 2);
    if let Some(first) = hard.first() {
        polyline.push(first.position());
    }

    for pair in hard.windows(2) {
        let p1 = pair[0].position();
        let p2 = pair[1].position();
        let segment = p2 - p1;
        let length_sq = segment.norm_squared();
        let half_length = 0.5 * length_sq.sqrt();

        let mut attractions: Vec<Attraction> = guides
            .iter()
            .filter_map(|guide| {
                let g = guide.position();
                let t = if length_sq > 0.0 {
                    ((g - p1).dot(&segment) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let projected = p1 + segment * t;
                let dist_sq = (g - projected).norm_squared();
                let reach = half_length + guide.radius;
                if dist_sq >= 2.0 * reach * reach {
                    return None;
                }

                let influence = guide
                    .guide_influence
                    .unwrap_or(default_influence)
                    .clamp(0.0, 1.0);
                Some(Attraction {
                    t,
                    point: projected + (g - projected) * influence,
                })
            })
            .collect();

        // Stable, so guides at the same t keep their declaration order.
        attractions.sort_by(|a, b| a.t.total_cmp(&b.t));

        polyline.extend(attractions.into_iter().map(|a| a.point));
        polyline.push(p2);
    }

    polyline.dedup();
    polyline
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn refs(waypoints: &[Waypoint]) -> Vec<&Waypoint> {
        waypoints.iter().collect()
    }

    #[test]
    fn test_no_guides_returns_hard_polyline() {
        let hard = vec![Waypoint::new(0.0, 0.0), Waypoint::new(1.0, 0.0), Waypoint::new(1.0, 1.0)];
        let out = blend_guide_points(&refs(&hard), &[], 0.5);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2], Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_guide_is_blended_by_influence() {
        let hard = vec![Waypoint::new(0.0, 0.0), Waypoint::new(4.0, 0.0)];
        let guide = Waypoint::new(2.0, 1.0).as_guide(0.5);
        let out = blend_guide_points(&refs(&hard), &[&guide], 0.5);

        assert_eq!(out.len(), 3);
        assert_abs_diff_eq!(out[1].x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1].y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_far_guide_is_ignored() {
        let hard = vec![Waypoint::new(0.0, 0.0), Waypoint::new(2.0, 0.0)];
        // half length 1 + radius 0.3 => threshold 2 * 1.3^2 = 3.38, dist^2 = 16
        let guide = Waypoint::new(1.0, 4.0).as_guide(1.0);
        let out = blend_guide_points(&refs(&hard), &[&guide], 0.5);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_guides_sorted_along_segment() {
        let hard = vec![Waypoint::new(0.0, 0.0), Waypoint::new(10.0, 0.0)];
        let late = Waypoint::new(8.0, 1.0).as_guide(1.0);
        let early = Waypoint::new(2.0, -1.0).as_guide(1.0);
        let out = blend_guide_points(&refs(&hard), &[&late, &early], 0.5);

        assert_eq!(out.len(), 4);
        assert_eq!(out[1], Point2::new(2.0, -1.0));
        assert_eq!(out[2], Point2::new(8.0, 1.0));
    }

    #[test]
    fn test_duplicates_collapse() {
        let hard = vec![Waypoint::new(0.0, 0.0), Waypoint::new(0.0, 0.0)];
        let out = blend_guide_points(&refs(&hard), &[], 0.5);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_missing_influence_uses_default() {
        let hard = vec![Waypoint::new(0.0, 0.0), Waypoint::new(4.0, 0.0)];
        let mut guide = Waypoint::new(2.0, 1.0);
        guide.is_guide_point = true;
        let out = blend_guide_points(&refs(&hard), &[&guide], 0.25);
        assert_abs_diff_eq!(out[1].y, 0.25, epsilon = 1e-12);
    }
}
