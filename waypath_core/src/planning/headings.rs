// waypath_core/src/planning/headings.rs

use crate::types::{PathPoint, Waypoint, WaypointHeadingTarget};
use crate::utils::angles::interpolate_angle_deg;

/// Heading targets for every waypoint (hard or guide) that declares a
/// heading, anchored at the arc length of the planar-nearest path point and
/// sorted by that arc length.
pub fn extract_heading_targets(
    waypoints: &[Waypoint],
    points: &[PathPoint],
) -> Vec<WaypointHeadingTarget> {
    let mut targets: Vec<WaypointHeadingTarget> = waypoints
        .iter()
        .filter_map(|wp| {
            let heading = wp.wrapped_heading()?;
            let nearest = nearest_point(points, wp.x, wp.y)?;
            Some(WaypointHeadingTarget {
                s: nearest.s,
                heading,
            })
        })
        .collect();

    targets.sort_by(|a, b| a.s.total_cmp(&b.s));
    targets
}

fn nearest_point(points: &[PathPoint], x: f64, y: f64) -> Option<&PathPoint> {
    let mut best: Option<(&PathPoint, f64)> = None;
    for point in points {
        let distance = point.distance_to(x, y);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((point, distance));
        }
    }
    best.map(|(point, _)| point)
}

/// Heading at arc length `s`, interpolated along the shorter arc between the
/// surrounding targets. Falls back to the one-sided target, then to `held`.
pub fn interpolate_heading(targets: &[WaypointHeadingTarget], s: f64, held: f64) -> f64 {
    let split = targets.partition_point(|t| t.s <= s);
    let prev = split.checked_sub(1).map(|i| &targets[i]);
    let next = targets.get(split);

    match (prev, next) {
        (Some(prev), Some(next)) => {
            let span = next.s - prev.s;
            let t = if span.abs() < 1e-9 {
                1.0
            } else {
                (s - prev.s) / span
            };
            interpolate_angle_deg(prev.heading, next.heading, t)
        }
        (Some(only), None) | (None, Some(only)) => only.heading,
        (None, None) => held,
    }
}
