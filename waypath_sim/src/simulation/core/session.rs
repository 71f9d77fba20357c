// waypath_sim/src/simulation/core/session.rs

use std::sync::Arc;

use tracing::info;
use waypath_core::prelude::*;

use crate::simulation::config::ScenarioConfig;

/// A planned scenario with a player loaded and ready to run.
#[derive(Debug)]
pub struct Session {
    pub name: String,
    pub waypoints: Vec<Waypoint>,
    pub planner: PlannerConfig,
    pub planned: Arc<PlannedPath>,
    pub player: SimulationPlayer,
}

impl Session {
    /// Plans the scenario's waypoints and loads the result into a new player.
    pub fn from_scenario(scenario: &ScenarioConfig) -> Result<Self, PlanningError> {
        let planned = PathPlanner::new(scenario.planner).plan(&scenario.waypoints)?;
        Ok(Self::assemble(
            &scenario.name,
            scenario.waypoints.clone(),
            scenario.planner,
            planned,
            scenario.playback_settings(),
        ))
    }

    /// Replans an imported document. The stored path is only used for a
    /// consistency report; playback always runs on the fresh plan.
    pub fn from_document(
        document: &PathDocument,
        settings: PlaybackSettings,
    ) -> Result<Self, PlanningError> {
        let planned = document.replan()?;
        if planned.points.len() != document.path.len() {
            info!(
                "Replanned '{}' has {} samples, the document stored {}",
                document.name,
                planned.points.len(),
                document.path.len()
            );
        }
        Ok(Self::assemble(
            &document.name,
            document.waypoints.clone(),
            document.config,
            planned,
            settings,
        ))
    }

    fn assemble(
        name: &str,
        waypoints: Vec<Waypoint>,
        planner: PlannerConfig,
        planned: PlannedPath,
        settings: PlaybackSettings,
    ) -> Self {
        if let Some(metrics) = &planned.metrics {
            log_metrics(name, planned.points.len(), metrics);
        }

        let planned = Arc::new(planned);
        let mut player = SimulationPlayer::new(settings);
        player.load(Arc::clone(&planned), waypoints.clone());

        Self {
            name: name.to_string(),
            waypoints,
            planner,
            planned,
            player,
        }
    }

    /// Bundles the session's plan for export.
    pub fn to_document(&self) -> PathDocument {
        PathDocument::new(&self.name, &self.waypoints, &self.planner, &self.planned)
    }
}

pub fn log_metrics(name: &str, samples: usize, metrics: &Metrics) {
    info!(
        "'{}': {} samples, distance {:.3} m, time {:.3} s, max curvature {:.3} 1/m, max accel {:.3} m/s^2, energy {:.1} J",
        name,
        samples,
        metrics.total_distance,
        metrics.total_time,
        metrics.max_curvature,
        metrics.max_acceleration,
        metrics.energy_consumption
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ScenarioConfig {
        ScenarioConfig {
            name: "line".to_string(),
            waypoints: vec![Waypoint::new(0.0, 0.0), Waypoint::new(3.0, 0.0)],
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn test_session_loads_player() {
        let session = Session::from_scenario(&scenario()).unwrap();
        assert!(session.planned.len() > 2);
        assert_eq!(session.player.state(), PlaybackState::Idle);
        assert!(Arc::ptr_eq(session.player.path(), &session.planned));
    }

    #[test]
    fn test_insufficient_waypoints_are_reported() {
        let mut scenario = scenario();
        scenario.waypoints.pop();
        let err = Session::from_scenario(&scenario).unwrap_err();
        assert_eq!(err, PlanningError::InsufficientHardWaypoints { found: 1 });
    }

    #[test]
    fn test_document_session_matches_scenario_session() {
        let original = Session::from_scenario(&scenario()).unwrap();
        let document = original.to_document();
        let restored = Session::from_document(&document, PlaybackSettings::default()).unwrap();
        assert_eq!(restored.planned.len(), original.planned.len());
        assert_eq!(restored.name, "line");
    }
}
