// waypath_core/src/planning/mod.rs

//! The path-synthesis pipeline: waypoints and config in, a profiled,
//! arc-length-sampled trajectory out.

use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::error::PlanningError;
use crate::spline::PathSpline;
use crate::types::{Metrics, PathPoint, Waypoint, WaypointHeadingTarget};

pub mod blend;
pub mod geometry;
pub mod headings;
pub mod profile;

pub use blend::blend_guide_points;
pub use headings::{extract_heading_targets, interpolate_heading};
pub use profile::{Profile, VelocityProfiler};

/// Upper bound on samples in one stream. A longer path at the configured
/// resolution is rejected instead of allocated.
pub const MAX_PATH_SAMPLES: usize = 10_000_000;

/// The complete output of one planning run. Built once and never mutated;
/// replanning produces a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedPath {
    pub points: Vec<PathPoint>,
    pub metrics: Option<Metrics>,
    pub heading_targets: Vec<WaypointHeadingTarget>,
}

impl PlannedPath {
    /// What a failed run publishes: no points and no metrics.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn duration(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.time)
    }
}

/// Runs the planning pipeline. Planning is pure: the same waypoints and
/// config always produce the same stream.
#[derive(Debug, Clone, Default)]
pub struct PathPlanner {
    config: PlannerConfig,
}

impl PathPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn plan(&self, waypoints: &[Waypoint]) -> Result<PlannedPath, PlanningError> {
        let result = self.plan_inner(waypoints);
        if let Err(e) = &result {
            warn!("Planning failed: {}", e);
        }
        result
    }

    /// Same as [`PathPlanner::plan`], but folds a failure into the advisory
    /// form a UI shows: an empty path next to the message.
    pub fn plan_or_empty(&self, waypoints: &[Waypoint]) -> (PlannedPath, Option<PlanningError>) {
        match self.plan(waypoints) {
            Ok(path) => (path, None),
            Err(e) => (PlannedPath::empty(), Some(e)),
        }
    }

    fn plan_inner(&self, waypoints: &[Waypoint]) -> Result<PlannedPath, PlanningError> {
        self.config.validate()?;

        for (index, wp) in waypoints.iter().enumerate() {
            wp.validate()
                .map_err(|reason| PlanningError::InvalidWaypoint { index, reason })?;
        }

        let (guides, hard): (Vec<&Waypoint>, Vec<&Waypoint>) =
            waypoints.iter().partition(|wp| wp.is_guide_point);
        if hard.len() < 2 {
            return Err(PlanningError::InsufficientHardWaypoints { found: hard.len() });
        }

        let control = blend_guide_points(&hard, &guides, self.config.path.default_guide_influence);
        if control.len() < 2 {
            return Err(PlanningError::InsufficientSplineInput {
                found: control.len(),
            });
        }

        let spline = PathSpline::fit(&control, self.config.path.spline_type);
        let samples = spline.total_length() / self.config.path.path_resolution;
        if !(samples.is_finite() && samples < MAX_PATH_SAMPLES as f64) {
            return Err(PlanningError::InvalidConfig(format!(
                "a {:.3} m path at {} m resolution exceeds {} samples",
                spline.total_length(),
                self.config.path.path_resolution,
                MAX_PATH_SAMPLES
            )));
        }
        let profile = VelocityProfiler::new(&self.config, &hard).run(&spline);
        let heading_targets = extract_heading_targets(waypoints, &profile.points);

        debug!(
            "Planned {} samples over {:.3} m ({} control points, {:?} spline), total time {:.3} s",
            profile.points.len(),
            profile.metrics.total_distance,
            control.len(),
            self.config.path.spline_type,
            profile.metrics.total_time
        );

        Ok(PlannedPath {
            points: profile.points,
            metrics: Some(profile.metrics),
            heading_targets,
        })
    }
}
