// waypath_sim/src/simulation/config/mod.rs

//! This module handles loading scenario configuration from disk, with
//! environment overrides layered on top, and discovering scenario files.

mod catalog;

pub mod structs;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::info;

// Re-export public types
pub use catalog::ScenarioCatalog;
pub use structs::{ScenarioConfig, SimulationSettings};

/// Prefix for environment overrides, e.g.
/// `WAYPATH_SIMULATION__SPEED_FACTOR=2.0` or `WAYPATH_PLANNER__ROBOT__MAX_VELOCITY=3`.
pub const ENV_PREFIX: &str = "WAYPATH_";

/// Top-level scenario keys an environment variable may override. Other
/// `WAYPATH_*` variables are ignored rather than rejected as unknown fields.
const ENV_SECTIONS: [&str; 3] = ["name", "simulation", "planner"];

fn env_overrides() -> Env {
    Env::prefixed(ENV_PREFIX).split("__").filter(|key| {
        let section = key.as_str().split('.').next().unwrap_or_default();
        ENV_SECTIONS.iter().any(|s| s.eq_ignore_ascii_case(section))
    })
}

fn extract(figment: Figment) -> Result<ScenarioConfig, figment::Error> {
    let scenario: ScenarioConfig = figment.extract()?;
    scenario.validate().map_err(figment::Error::from)?;
    Ok(scenario)
}

/// Loads a scenario TOML file and applies `WAYPATH_*` environment overrides.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, figment::Error> {
    info!("Loading scenario from: {}", path.display());
    extract(Figment::new().merge(Toml::file(path)).merge(env_overrides()))
}

/// Parses a scenario from TOML text, without environment overrides.
pub fn parse_scenario(toml_text: &str) -> Result<ScenarioConfig, figment::Error> {
    extract(Figment::new().merge(Toml::string(toml_text)))
}

/// Serializes a scenario back into TOML.
pub fn scenario_to_toml(scenario: &ScenarioConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use waypath_core::prelude::SplineType;

    const SCENARIO: &str = r#"
name = "corridor"

[simulation]
speed_factor = 2.0
tick_rate_hz = 30.0

[planner.robot]
max_velocity = 1.5

[planner.path]
spline_type = "quintic"
path_resolution = 0.1

[[waypoints]]
x = 0.0
y = 0.0
heading = 0.0

[[waypoints]]
x = 2.0
y = 1.0
isGuidePoint = true
guideInfluence = 0.4

[[waypoints]]
x = 4.0
y = 0.0
radius = 0.5
stopAtWaypoint = true
stopDuration = 1.5
"#;

    #[test]
    fn test_parse_scenario_fills_defaults() {
        let scenario = parse_scenario(SCENARIO).unwrap();
        assert_eq!(scenario.name, "corridor");
        assert_eq!(scenario.simulation.speed_factor, 2.0);
        assert_eq!(scenario.simulation.max_duration_seconds, 600.0);
        assert_eq!(scenario.planner.robot.max_velocity, 1.5);
        assert_eq!(scenario.planner.robot.max_acceleration, 1.0);
        assert_eq!(scenario.planner.path.spline_type, SplineType::Quintic);
        assert_eq!(scenario.waypoints.len(), 3);
        assert_eq!(scenario.waypoints[0].radius, 0.3);
        assert!(scenario.waypoints[1].is_guide_point);
        assert_eq!(scenario.waypoints[2].stop_duration, Some(1.5));

        let settings = scenario.playback_settings();
        assert_eq!(settings.speed_factor, 2.0);
        assert_eq!(settings.default_stop_duration, 1.0);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = parse_scenario("name = \"x\"\n[simulation]\nwarp_drive = true\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_waypoint_keys_are_checked() {
        let typo = "[[waypoints]]\nx = 0.0\ny = 0.0\n\n[[waypoints]]\nx = 1.0\ny = 0.0\nstopAtWaypont = true\n";
        assert!(parse_scenario(typo).is_err());

        let snake_case = r#"
[[waypoints]]
x = 0.0
y = 0.0

[[waypoints]]
x = 4.0
y = 0.0
stop_at_waypoint = true
stop_duration = 3.0
max_velocity_constraint = 0.5
"#;
        let scenario = parse_scenario(snake_case).unwrap();
        let stop = &scenario.waypoints[1];
        assert!(stop.stop_at_waypoint);
        assert_eq!(stop.stop_duration, Some(3.0));
        assert_eq!(stop.max_velocity_constraint, Some(0.5));
        assert_eq!(stop.radius, 0.3);
    }

    #[test]
    fn test_unusable_simulation_settings_are_rejected() {
        for bad in ["speed_factor = -1.0", "speed_factor = nan", "tick_rate_hz = 0.0"] {
            let text = format!("[simulation]\n{}\n", bad);
            assert!(parse_scenario(&text).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_env_overrides_win_over_the_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("scenario.toml", SCENARIO)?;
            jail.set_env("WAYPATH_SIMULATION__SPEED_FACTOR", "3.5");
            jail.set_env("WAYPATH_HOME", "/somewhere/else");

            let scenario = load_scenario(Path::new("scenario.toml"))?;
            assert_eq!(scenario.simulation.speed_factor, 3.5);
            assert_eq!(scenario.simulation.tick_rate_hz, 30.0);
            assert_eq!(scenario.waypoints.len(), 3);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCENARIO.as_bytes()).unwrap();
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.waypoints.len(), 3);
    }

    #[test]
    fn test_toml_round_trip() {
        let scenario = parse_scenario(SCENARIO).unwrap();
        let text = scenario_to_toml(&scenario).unwrap();
        let back = parse_scenario(&text).unwrap();
        assert_eq!(back, scenario);
    }
}
