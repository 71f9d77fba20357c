// waypath_core/src/prelude.rs

// --- Core Abstractions ---
pub use crate::spline::{PathSpline, Spline, SplineType};

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::config::{PathConfig, PhysicsConfig, PlannerConfig, RobotConfig};
pub use crate::document::PathDocument;
pub use crate::types::{
    HistorySample, Metrics, PathPoint, RobotPose, Waypoint, WaypointHeadingTarget,
};

// --- Errors ---
pub use crate::error::{DocumentError, PlanningError, PlaybackError};

// --- Planning & Playback ---
pub use crate::planning::{PathPlanner, PlannedPath};
pub use crate::playback::{PlaybackSettings, PlaybackState, SimulationPlayer};
pub use crate::utils::angles::{interpolate_angle_deg, normalize_angle_deg};
