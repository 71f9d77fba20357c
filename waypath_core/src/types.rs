// waypath_core/src/types.rs

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::utils::angles::normalize_angle_deg;

/// Radius a waypoint gets when none is given, in meters.
pub const DEFAULT_WAYPOINT_RADIUS: f64 = 0.3;

fn default_radius() -> f64 {
    DEFAULT_WAYPOINT_RADIUS
}

// =========================================================================
// == Planning Input ==
// =========================================================================

/// A user-placed waypoint. The planner treats the list it receives as an
/// immutable snapshot for the duration of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    /// Position in meters.
    pub x: f64,
    pub y: f64,
    /// Snap / influence radius in meters. Must be > 0.
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Speed the robot should hold while inside `radius` (m/s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_velocity: Option<f64>,
    /// Upper bound on speed while inside `radius` (m/s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_velocity_constraint: Option<f64>,
    /// Desired robot heading at this waypoint, in degrees. Any real value;
    /// interpreted modulo 360 and wrapped to (-180, 180].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default)]
    pub stop_at_waypoint: bool,
    /// Seconds to hold at a stop waypoint. Ignored unless `stop_at_waypoint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_duration: Option<f64>,
    #[serde(default)]
    pub is_guide_point: bool,
    /// Blend weight in [0, 1]. Ignored unless `is_guide_point`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_influence: Option<f64>,
}

impl Waypoint {
    /// A plain hard waypoint with the default radius.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            radius: default_radius(),
            target_velocity: None,
            max_velocity_constraint: None,
            heading: None,
            stop_at_waypoint: false,
            stop_duration: None,
            is_guide_point: false,
            guide_influence: None,
        }
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_stop(mut self, duration: Option<f64>) -> Self {
        self.stop_at_waypoint = true;
        self.stop_duration = duration;
        self
    }

    pub fn as_guide(mut self, influence: f64) -> Self {
        self.is_guide_point = true;
        self.guide_influence = Some(influence);
        self
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }

    /// The declared heading wrapped to (-180, 180], if any.
    pub fn wrapped_heading(&self) -> Option<f64> {
        self.heading.map(normalize_angle_deg)
    }

    /// Checks the values the planner does arithmetic on. Returns a reason
    /// suitable for an error message.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(format!("position ({}, {}) is not finite", self.x, self.y));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(format!("radius must be positive, got {}", self.radius));
        }
        let optional = [
            ("targetVelocity", self.target_velocity),
            ("maxVelocityConstraint", self.max_velocity_constraint),
            ("heading", self.heading),
            ("stopDuration", self.stop_duration),
            ("guideInfluence", self.guide_influence),
        ];
        for (name, value) in optional {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(format!("{} must be finite, got {}", name, value));
            }
        }
        Ok(())
    }
}

// =========================================================================
// == Planning Output ==
// =========================================================================

/// One arc-length sample of the planned trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    /// Cumulative arc length from the start of the path (m).
    pub s: f64,
    /// Achieved speed (m/s), never negative.
    pub velocity: f64,
    /// Signed acceleration over the segment ending at this sample (m/s²).
    pub acceleration: f64,
    /// Curvature magnitude (1/m).
    pub curvature: f64,
    /// Tangent heading (degrees).
    pub heading: f64,
    /// Elapsed time from the start of the path (s).
    pub time: f64,
}

impl PathPoint {
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Aggregates derived alongside the path point stream.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_distance: f64,
    pub total_time: f64,
    pub max_curvature: f64,
    pub max_acceleration: f64,
    /// Heuristic integral of mechanical power over time (J).
    pub energy_consumption: f64,
}

/// A heading the robot should reach at arc length `s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaypointHeadingTarget {
    pub s: f64,
    /// Degrees, wrapped to (-180, 180].
    pub heading: f64,
}

// =========================================================================
// == Playback Output ==
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotPose {
    pub x: f64,
    pub y: f64,
    /// Degrees.
    pub rotation: f64,
    /// m/s.
    pub velocity: f64,
    /// deg/s.
    pub angular_velocity: f64,
}

/// A pose snapshot keyed by simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub time: f64,
    pub pose: RobotPose,
}
