// waypath_sim/src/simulation/config/structs.rs

use serde::{Deserialize, Deserializer, Serialize};
use waypath_core::prelude::{PlannerConfig, PlaybackSettings, Waypoint};
use waypath_core::types::DEFAULT_WAYPOINT_RADIUS;

fn default_name() -> String {
    "untitled".to_string()
}

// =========================================================================
// == Top-Level Scenario Configuration ==
// =========================================================================

/// # ScenarioConfig
/// The root of the data parsed from a `scenario.toml` file: a named waypoint
/// list, the planner config and the playback settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub planner: PlannerConfig,

    // The TOML has `[[waypoints]]`, read strictly through `ScenarioWaypoint`.
    #[serde(default, deserialize_with = "deserialize_waypoints")]
    pub waypoints: Vec<Waypoint>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            simulation: SimulationSettings::default(),
            planner: PlannerConfig::default(),
            waypoints: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    /// Rejects simulation settings the replay loop cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            (self.simulation.speed_factor, "simulation.speed_factor"),
            (self.simulation.tick_rate_hz, "simulation.tick_rate_hz"),
            (self.simulation.max_duration_seconds, "simulation.max_duration_seconds"),
        ];
        for (value, name) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }
        Ok(())
    }

    /// Player settings derived from the scenario.
    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            speed_factor: self.simulation.speed_factor,
            default_stop_duration: self.planner.path.default_stop_duration,
        }
    }
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Simulated seconds per wall-clock second.
    pub speed_factor: f64,
    /// How often the replay loop ticks the player, in Hz.
    pub tick_rate_hz: f64,
    /// Wall-clock budget for one replay; the run is stopped after this.
    pub max_duration_seconds: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            tick_rate_hz: 60.0,
            max_duration_seconds: 600.0,
        }
    }
}

// =========================================================================
// == Scenario Waypoints ==
// =========================================================================

/// A `[[waypoints]]` entry as written in a scenario file. Unlike the export
/// document, scenario files reject unknown keys, and the snake_case spelling
/// used by the other sections is accepted next to the camelCase one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ScenarioWaypoint {
    x: f64,
    y: f64,
    #[serde(default = "default_radius")]
    radius: f64,
    #[serde(default, alias = "target_velocity")]
    target_velocity: Option<f64>,
    #[serde(default, alias = "max_velocity_constraint")]
    max_velocity_constraint: Option<f64>,
    #[serde(default)]
    heading: Option<f64>,
    #[serde(default, alias = "stop_at_waypoint")]
    stop_at_waypoint: bool,
    #[serde(default, alias = "stop_duration")]
    stop_duration: Option<f64>,
    #[serde(default, alias = "is_guide_point")]
    is_guide_point: bool,
    #[serde(default, alias = "guide_influence")]
    guide_influence: Option<f64>,
}

fn default_radius() -> f64 {
    DEFAULT_WAYPOINT_RADIUS
}

impl From<ScenarioWaypoint> for Waypoint {
    fn from(wp: ScenarioWaypoint) -> Self {
        Waypoint {
            x: wp.x,
            y: wp.y,
            radius: wp.radius,
            target_velocity: wp.target_velocity,
            max_velocity_constraint: wp.max_velocity_constraint,
            heading: wp.heading,
            stop_at_waypoint: wp.stop_at_waypoint,
            stop_duration: wp.stop_duration,
            is_guide_point: wp.is_guide_point,
            guide_influence: wp.guide_influence,
        }
    }
}

fn deserialize_waypoints<'de, D>(deserializer: D) -> Result<Vec<Waypoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let waypoints = Vec::<ScenarioWaypoint>::deserialize(deserializer)?;
    Ok(waypoints.into_iter().map(Waypoint::from).collect())
}
