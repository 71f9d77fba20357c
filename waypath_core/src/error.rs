// waypath_core/src/error.rs

use thiserror::Error;

/// Advisory planning failures. The caller shows the message and keeps an
/// empty path; nothing here is fatal to the application.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    #[error("at least 2 hard waypoints are required to plan a path, found {found}")]
    InsufficientHardWaypoints { found: usize },

    #[error("guide blending left {found} control point(s); the spline needs at least 2")]
    InsufficientSplineInput { found: usize },

    #[error("waypoint {index} is invalid: {reason}")]
    InvalidWaypoint { index: usize, reason: String },

    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),
}

/// Errors at the import/export boundary.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed import: {0}")]
    MalformedImport(String),

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("playback needs at least 2 path points, the loaded path has {len}")]
    InsufficientPath { len: usize },

    #[error("cannot scrub while playback is active; stop it first")]
    ScrubWhilePlaying,

    #[error("no path point at index {index}; playback was stopped")]
    MissingPathPoint { index: usize },
}
