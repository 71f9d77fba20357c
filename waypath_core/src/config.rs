// waypath_core/src/config.rs

use serde::{Deserialize, Serialize};

use crate::error::PlanningError;
use crate::spline::SplineType;

// =========================================================================
// == Top-Level Planner Configuration ==
// =========================================================================

/// # PlannerConfig
/// Everything the planner needs besides the waypoint list. Every section
/// falls back to its defaults when missing from a scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub robot: RobotConfig,
    pub physics: PhysicsConfig,
    pub path: PathConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    /// m/s
    pub max_velocity: f64,
    /// m/s^2, applied symmetrically to acceleration and braking.
    pub max_acceleration: f64,
    /// kg, only used for the energy estimate.
    pub mass: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            max_velocity: 2.0,
            max_acceleration: 1.0,
            mass: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsConfig {
    pub friction_coefficient: f64,
    /// m/s^2
    pub gravity: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction_coefficient: 0.1,
            gravity: 9.81,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathConfig {
    pub spline_type: SplineType,
    /// Target spacing between samples, in meters.
    pub path_resolution: f64,
    /// Hold time for stop waypoints that don't declare their own.
    pub default_stop_duration: f64,
    /// Blend weight for guide points that don't declare their own.
    pub default_guide_influence: f64,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            spline_type: SplineType::Cubic,
            path_resolution: 0.05,
            default_stop_duration: 1.0,
            default_guide_influence: 0.5,
        }
    }
}

impl PlannerConfig {
    /// Rejects values the profiler would divide by or take roots of.
    pub fn validate(&self) -> Result<(), PlanningError> {
        let checks = [
            (self.robot.max_velocity, "robot.max_velocity"),
            (self.robot.max_acceleration, "robot.max_acceleration"),
            (self.robot.mass, "robot.mass"),
            (self.path.path_resolution, "path.path_resolution"),
        ];
        for (value, name) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlanningError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !(self.path.default_stop_duration >= 0.0) {
            return Err(PlanningError::InvalidConfig(format!(
                "path.default_stop_duration must not be negative, got {}",
                self.path.default_stop_duration
            )));
        }

        if !(0.0..=1.0).contains(&self.path.default_guide_influence) {
            return Err(PlanningError::InvalidConfig(format!(
                "path.default_guide_influence must lie in [0, 1], got {}",
                self.path.default_guide_influence
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let mut config = PlannerConfig::default();
        config.path.path_resolution = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PlanningError::InvalidConfig(msg) if msg.contains("path_resolution")));
    }

    #[test]
    fn test_rejects_nan_acceleration() {
        let mut config = PlannerConfig::default();
        config.robot.max_acceleration = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{ "robot": { "max_velocity": 4.0 } }"#).unwrap();
        assert_eq!(config.robot.max_velocity, 4.0);
        assert_eq!(config.robot.max_acceleration, 1.0);
        assert_eq!(config.path, PathConfig::default());
    }
}
