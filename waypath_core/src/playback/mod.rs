// waypath_core/src/playback/mod.rs

//! Tick-driven replay of a planned path.

use serde::{Deserialize, Serialize};

pub mod history;
pub mod player;

pub use history::History;
pub use player::SimulationPlayer;

/// Defines the phases of one playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing is playing. The last pose and history stay inspectable.
    #[default]
    Idle,
    /// Ticks advance simulated time.
    Running,
    /// Holding at a stop waypoint until the hold timer runs out.
    /// Ticks only advance the wall clock.
    PausedAtStop,
    /// Simulated time ran past the end of the path.
    Finished,
}

impl PlaybackState {
    /// True while a run is in progress (including a stop hold).
    pub fn is_active(self) -> bool {
        matches!(self, PlaybackState::Running | PlaybackState::PausedAtStop)
    }
}

/// Knobs for the player that don't belong to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackSettings {
    /// Simulated seconds per wall-clock second.
    pub speed_factor: f64,
    /// Hold time for stop waypoints without their own `stop_duration`.
    pub default_stop_duration: f64,
}

impl PlaybackSettings {
    /// Replaces values the player cannot run with. A negative, NaN or
    /// infinite speed factor or stop duration becomes 0.
    pub fn sanitized(self) -> Self {
        Self {
            speed_factor: non_negative(self.speed_factor),
            default_stop_duration: non_negative(self.default_stop_duration),
        }
    }
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            default_stop_duration: 1.0,
        }
    }
}
