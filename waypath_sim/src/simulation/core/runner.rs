// waypath_sim/src/simulation/core/runner.rs

//! The replay loop: ticks a [`SimulationPlayer`] until its run finishes.

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};
use waypath_core::prelude::*;

use crate::simulation::config::SimulationSettings;
use crate::simulation::utils::scheduling::TickScheduler;

/// How the loop turns ticks into elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep between ticks and feed the measured real elapsed time.
    RealTime,
    /// Feed exactly one scheduler period per tick, without sleeping.
    Fast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub final_state: PlaybackState,
    pub ticks: u64,
    /// Wall-clock seconds fed to the player.
    pub wall_time: f64,
    pub simulated_time: f64,
    pub stop_holds: usize,
    pub history_samples: usize,
    pub final_pose: RobotPose,
    /// True if the run hit `max_duration_seconds` and was stopped.
    pub timed_out: bool,
}

/// Plays the loaded path from the start until it finishes or the wall-clock
/// budget runs out.
pub fn run_playback(
    player: &mut SimulationPlayer,
    settings: &SimulationSettings,
    pacing: Pacing,
) -> Result<RunSummary> {
    let mut scheduler = TickScheduler::new(settings.tick_rate_hz)
        .ok_or_else(|| anyhow!("tick_rate_hz must be positive, got {}", settings.tick_rate_hz))?;
    let fixed_dt = scheduler.period().as_secs_f64();

    player.play()?;
    scheduler.reset();

    let mut ticks = 0u64;
    let mut wall_time = 0.0;
    let mut stop_holds = 0usize;
    let mut previous_state = player.state();
    let mut timed_out = false;

    loop {
        let dt = match pacing {
            Pacing::RealTime => scheduler.wait_for_next_tick(),
            Pacing::Fast => fixed_dt,
        };

        let state = match player.tick(dt) {
            Ok(state) => state,
            Err(e) => {
                player.stop();
                return Err(e.into());
            }
        };
        ticks += 1;
        wall_time += dt;

        if state != previous_state {
            debug!("{:?} -> {:?} at tick {}", previous_state, state, ticks);
            if state == PlaybackState::PausedAtStop {
                stop_holds += 1;
            }
            previous_state = state;
        }

        if state == PlaybackState::Finished {
            break;
        }

        if wall_time >= settings.max_duration_seconds {
            warn!(
                "Replay exceeded its {:.1} s budget; stopping at t = {:.3} s",
                settings.max_duration_seconds,
                player.simulated_time()
            );
            player.stop();
            timed_out = true;
            break;
        }
    }

    let summary = RunSummary {
        final_state: player.state(),
        ticks,
        wall_time,
        simulated_time: player.simulated_time(),
        stop_holds,
        history_samples: player.history().len(),
        final_pose: *player.pose(),
        timed_out,
    };

    info!(
        "Replay {:?} after {} ticks: {:.3} s wall, {:.3} s simulated, {} stop hold(s), final pose ({:.3}, {:.3}) @ {:.1} deg",
        summary.final_state,
        summary.ticks,
        summary.wall_time,
        summary.simulated_time,
        summary.stop_holds,
        summary.final_pose.x,
        summary.final_pose.y,
        summary.final_pose.rotation
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::ScenarioConfig;
    use crate::simulation::core::session::Session;
    use approx::assert_abs_diff_eq;

    fn stop_scenario() -> ScenarioConfig {
        ScenarioConfig {
            name: "stop".to_string(),
            waypoints: vec![
                Waypoint::new(0.0, 0.0).with_heading(0.0),
                Waypoint::new(2.0, 0.0).with_radius(0.4).with_stop(Some(0.5)),
                Waypoint::new(4.0, 0.0).with_heading(90.0),
            ],
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn test_fast_replay_finishes_with_one_hold() {
        let scenario = stop_scenario();
        let mut session = Session::from_scenario(&scenario).unwrap();
        let summary =
            run_playback(&mut session.player, &scenario.simulation, Pacing::Fast).unwrap();

        assert_eq!(summary.final_state, PlaybackState::Finished);
        assert!(!summary.timed_out);
        assert_eq!(summary.stop_holds, 1);
        // The hold consumes wall time without advancing the path.
        assert!(summary.simulated_time >= session.planned.duration());
        assert!(summary.wall_time >= session.planned.duration() + 0.5 - 1e-6);
        assert_abs_diff_eq!(summary.final_pose.x, 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.final_pose.rotation, 90.0, epsilon = 1e-9);
        assert_eq!(summary.final_pose.velocity, 0.0);
    }

    #[test]
    fn test_budget_stops_the_run() {
        let mut scenario = stop_scenario();
        scenario.simulation.max_duration_seconds = 0.5;
        let mut session = Session::from_scenario(&scenario).unwrap();
        let summary =
            run_playback(&mut session.player, &scenario.simulation, Pacing::Fast).unwrap();

        assert!(summary.timed_out);
        assert_eq!(summary.final_state, PlaybackState::Idle);
        // Pose and history survive the stop.
        assert!(summary.history_samples > 1);
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let mut scenario = stop_scenario();
        scenario.simulation.tick_rate_hz = 0.0;
        let mut session = Session::from_scenario(&scenario).unwrap();
        assert!(run_playback(&mut session.player, &scenario.simulation, Pacing::Fast).is_err());
    }
}
