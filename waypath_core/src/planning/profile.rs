// waypath_core/src/planning/profile.rs

//! Forward-pass velocity profiling over the fitted spline.

use crate::config::PlannerConfig;
use crate::planning::geometry::{curvature, heading_deg};
use crate::spline::PathSpline;
use crate::types::{Metrics, PathPoint, Waypoint};

// --- Numerical guards ---
/// Curvature below this does not limit speed.
const CURVATURE_LIMIT_THRESHOLD: f64 = 1e-3;
/// Segments shorter than this carry no acceleration.
const MIN_SEGMENT_LENGTH: f64 = 1e-9;
/// Accelerations below this use the average-speed time formula.
const ACCELERATION_EPSILON: f64 = 1e-6;
/// Speed sums below this use the fallback tick.
const SPEED_EPSILON: f64 = 1e-6;
/// Time charged to a segment the robot cannot traverse (both ends at rest).
const FALLBACK_SEGMENT_TIME: f64 = 0.02;
const MIN_SEGMENT_TIME: f64 = 1e-5;

// --- Stop zone shaping ---
const STOP_ZONE_BRAKING_FACTOR: f64 = 1.5;
/// Seconds of travel at max speed that bound the stop zone.
const STOP_ZONE_HORIZON: f64 = 1.0;
const EFFECTIVE_STOP_RADIUS_FACTOR: f64 = 0.70;
const EFFECTIVE_STOP_RESOLUTION_FACTOR: f64 = 2.0;

/// The profiled stream plus its aggregates.
#[derive(Debug, Clone)]
pub struct Profile {
    pub points: Vec<PathPoint>,
    pub metrics: Metrics,
}

/// Walks the spline once from s = 0 to its end, assigning each sample the
/// speed the robot can actually reach under its acceleration limit, the
/// curvature limit and the waypoint constraints.
pub struct VelocityProfiler<'a> {
    config: &'a PlannerConfig,
    hard_waypoints: &'a [&'a Waypoint],
}

impl<'a> VelocityProfiler<'a> {
    pub fn new(config: &'a PlannerConfig, hard_waypoints: &'a [&'a Waypoint]) -> Self {
        Self {
            config,
            hard_waypoints,
        }
    }

    pub fn run(&self, spline: &PathSpline) -> Profile {
        let robot = &self.config.robot;
        let resolution = self.config.path.path_resolution;
        let total_distance = spline.total_length();

        let num_points = if total_distance > 0.0 {
            (total_distance / resolution).ceil() as usize
        } else {
            0
        };
        let step = if num_points > 0 {
            total_distance / num_points as f64
        } else {
            0.0
        };

        let mut points = Vec::with_capacity(num_points + 1);
        let mut metrics = Metrics {
            total_distance,
            ..Metrics::default()
        };

        let mut v_prev = 0.0;
        let mut s_prev = 0.0;
        let mut time = 0.0;

        for i in 0..=num_points {
            let s = i as f64 * step;
            let position = spline.position(s);
            let d1 = spline.derivative(s);
            let d2 = spline.second_derivative(s);
            let kappa = curvature(&d1, &d2);
            let heading = heading_deg(&d1);

            let (target, force_stop) = self.target_velocity(position.x, position.y, kappa, v_prev);

            // --- Integrate under the acceleration limit ---
            let ds = s - s_prev;
            let mut velocity = if ds < MIN_SEGMENT_LENGTH {
                v_prev
            } else {
                let reach = 2.0 * robot.max_acceleration * ds;
                if target >= v_prev {
                    target.min((v_prev * v_prev + reach).sqrt())
                } else {
                    target.max((v_prev * v_prev - reach).max(0.0).sqrt())
                }
            };
            if force_stop {
                velocity = 0.0;
            }

            let mut acceleration = 0.0;
            let mut segment_time = 0.0;
            if ds >= MIN_SEGMENT_LENGTH {
                acceleration = ((velocity * velocity - v_prev * v_prev) / (2.0 * ds))
                    .clamp(-robot.max_acceleration, robot.max_acceleration);
                segment_time = self.segment_time(v_prev, velocity, ds, &mut acceleration);
            }

            time += segment_time;

            // --- Aggregates ---
            let v_avg = 0.5 * (v_prev + velocity);
            let power = (robot.mass * acceleration.abs() * v_avg.abs()).abs()
                + 0.5
                    * self.config.physics.friction_coefficient
                    * robot.mass
                    * self.config.physics.gravity
                    * v_avg.abs();
            metrics.energy_consumption += power * segment_time;
            metrics.max_curvature = metrics.max_curvature.max(kappa);
            metrics.max_acceleration = metrics.max_acceleration.max(acceleration.abs());

            points.push(PathPoint {
                x: position.x,
                y: position.y,
                s,
                velocity,
                acceleration,
                curvature: kappa,
                heading,
                time,
            });

            v_prev = velocity;
            s_prev = s;
        }

        metrics.total_time = time;
        Profile { points, metrics }
    }

    /// The speed this sample should aim for, and whether it must be exactly 0.
    fn target_velocity(&self, x: f64, y: f64, kappa: f64, v_prev: f64) -> (f64, bool) {
        let robot = &self.config.robot;
        let mut target = robot.max_velocity;
        if kappa > CURVATURE_LIMIT_THRESHOLD {
            target = target.min((robot.max_acceleration / kappa).sqrt());
        }

        let Some((waypoint, distance)) = self.nearest_hard_waypoint(x, y) else {
            return (target, false);
        };

        if waypoint.stop_at_waypoint {
            let stopping_distance = v_prev * v_prev / (2.0 * robot.max_acceleration);
            let zone = waypoint.radius.max(
                (STOP_ZONE_BRAKING_FACTOR * stopping_distance)
                    .min(robot.max_velocity * STOP_ZONE_HORIZON),
            );
            let effective_stop = (EFFECTIVE_STOP_RADIUS_FACTOR * waypoint.radius)
                .min(EFFECTIVE_STOP_RESOLUTION_FACTOR * self.config.path.path_resolution);

            if distance <= effective_stop {
                return (0.0, true);
            }
            if distance < zone {
                let to_edge = (distance - effective_stop).max(0.0);
                target = target.min((2.0 * robot.max_acceleration * to_edge).sqrt());
            }
        } else if distance < waypoint.radius {
            if let Some(limit) = waypoint.max_velocity_constraint {
                target = target.min(limit);
            }
            if let Some(wanted) = waypoint.target_velocity {
                target = target.min(wanted);
            }
        }

        (target.max(0.0), false)
    }

    /// Planar nearest hard waypoint. Arc-length order is deliberately ignored,
    /// so a path that revisits an area binds to whichever waypoint is closest.
    fn nearest_hard_waypoint(&self, x: f64, y: f64) -> Option<(&Waypoint, f64)> {
        let mut best: Option<(&Waypoint, f64)> = None;
        for waypoint in self.hard_waypoints {
            let distance = waypoint.distance_to(x, y);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((*waypoint, distance));
            }
        }
        best
    }

    /// Duration of one segment. May adjust `acceleration` so it stays
    /// consistent with a floored duration.
    fn segment_time(&self, v_prev: f64, velocity: f64, ds: f64, acceleration: &mut f64) -> f64 {
        let dv = velocity - v_prev;
        let raw = if acceleration.abs() > ACCELERATION_EPSILON {
            dv / *acceleration
        } else if v_prev + velocity > SPEED_EPSILON {
            2.0 * ds / (v_prev + velocity)
        } else {
            FALLBACK_SEGMENT_TIME
        };

        let dt = raw.abs();
        if dt < MIN_SEGMENT_TIME {
            let max_acceleration = self.config.robot.max_acceleration;
            *acceleration = (dv / MIN_SEGMENT_TIME).clamp(-max_acceleration, max_acceleration);
            return MIN_SEGMENT_TIME;
        }
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::SplineType;
    use approx::assert_abs_diff_eq;
    use nalgebra::Point2;

    fn straight(length: f64) -> PathSpline {
        PathSpline::fit(
            &[Point2::new(0.0, 0.0), Point2::new(length, 0.0)],
            SplineType::Cubic,
        )
    }

    fn config(max_velocity: f64, max_acceleration: f64, resolution: f64) -> PlannerConfig {
        let mut config = PlannerConfig::default();
        config.robot.max_velocity = max_velocity;
        config.robot.max_acceleration = max_acceleration;
        config.path.path_resolution = resolution;
        config
    }

    #[test]
    fn test_sample_count_and_arc_length_span() {
        let a = Waypoint::new(0.0, 0.0);
        let b = Waypoint::new(5.0, 0.0);
        let hard = [&a, &b];
        let config = config(4.0, 3.0, 0.5);
        let profile = VelocityProfiler::new(&config, &hard).run(&straight(5.0));

        assert_eq!(profile.points.len(), 11);
        assert_abs_diff_eq!(profile.points[0].s, 0.0);
        assert_abs_diff_eq!(profile.points[10].s, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(profile.metrics.total_distance, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_starts_at_rest_and_respects_acceleration_limit() {
        let a = Waypoint::new(0.0, 0.0);
        let b = Waypoint::new(10.0, 0.0);
        let hard = [&a, &b];
        let config = config(2.0, 1.0, 0.1);
        let profile = VelocityProfiler::new(&config, &hard).run(&straight(10.0));

        assert_eq!(profile.points[0].velocity, 0.0);
        assert_eq!(profile.points[0].time, 0.0);
        for pair in profile.points.windows(2) {
            assert!(pair[1].time >= pair[0].time);
            assert!(pair[1].velocity >= 0.0);
            assert!(pair[1].acceleration.abs() <= 1.0 + 1e-9);
        }
        // Reaches the cap on a 10 m straight with a 2 m ramp.
        let peak = profile.points.iter().map(|p| p.velocity).fold(0.0, f64::max);
        assert_abs_diff_eq!(peak, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constraint_inside_radius_caps_speed() {
        let a = Waypoint::new(0.0, 0.0);
        let mut slow = Waypoint::new(5.0, 0.0).with_radius(1.0);
        slow.max_velocity_constraint = Some(0.8);
        slow.target_velocity = Some(0.5);
        let c = Waypoint::new(10.0, 0.0);
        let hard = [&a, &slow, &c];
        let config = config(2.0, 5.0, 0.05);
        let spline = PathSpline::fit(
            &[a.position(), slow.position(), c.position()],
            SplineType::Cubic,
        );
        let profile = VelocityProfiler::new(&config, &hard).run(&spline);

        let at_center = profile
            .points
            .iter()
            .min_by(|p, q| p.distance_to(5.0, 0.0).total_cmp(&q.distance_to(5.0, 0.0)))
            .unwrap();
        assert!(at_center.velocity <= 0.5 + 1e-9);
    }

    #[test]
    fn test_stop_waypoint_forces_zero() {
        let a = Waypoint::new(0.0, 0.0);
        let stop = Waypoint::new(5.0, 0.0).with_radius(0.5).with_stop(Some(2.0));
        let c = Waypoint::new(10.0, 0.0);
        let hard = [&a, &stop, &c];
        let config = config(2.0, 1.0, 0.05);
        let spline = PathSpline::fit(
            &[a.position(), stop.position(), c.position()],
            SplineType::Cubic,
        );
        let profile = VelocityProfiler::new(&config, &hard).run(&spline);

        let stopped: Vec<_> = profile
            .points
            .iter()
            .filter(|p| p.distance_to(5.0, 0.0) < 0.5 && p.velocity == 0.0)
            .collect();
        assert!(!stopped.is_empty());
        for p in &profile.points {
            assert!(p.acceleration.abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_energy_and_time_accumulate() {
        let a = Waypoint::new(0.0, 0.0);
        let b = Waypoint::new(3.0, 0.0);
        let hard = [&a, &b];
        let config = config(1.0, 1.0, 0.1);
        let profile = VelocityProfiler::new(&config, &hard).run(&straight(3.0));

        assert!(profile.metrics.total_time > 3.0);
        assert!(profile.metrics.energy_consumption > 0.0);
        assert_abs_diff_eq!(
            profile.metrics.total_time,
            profile.points.last().unwrap().time,
            epsilon = 1e-12
        );
    }
}
