// waypath_core/src/playback/player.rs

use std::sync::Arc;

use tracing::{error, info};

use crate::error::PlaybackError;
use crate::planning::{interpolate_heading, PlannedPath};
use crate::playback::{non_negative, History, PlaybackSettings, PlaybackState};
use crate::types::{PathPoint, RobotPose, Waypoint};
use crate::utils::angles::shortest_angle_diff_deg;

/// Distance, as a fraction of the waypoint radius, inside which a slow
/// sample triggers a stop hold.
const STOP_TRIGGER_RADIUS_FACTOR: f64 = 0.75;
/// Samples slower than this count as stopped (m/s).
const STOP_TRIGGER_VELOCITY: f64 = 0.05;

/// Hold timer armed when entering `PausedAtStop`. It runs on the player's
/// wall clock, not on simulated time, and belongs to a single run.
#[derive(Debug, Clone, Copy)]
struct StopTimer {
    deadline: f64,
    generation: u64,
}

/// Replays a [`PlannedPath`] as a single-threaded state machine.
///
/// The host calls [`SimulationPlayer::tick`] once per frame with the real
/// elapsed time. Simulated time advances by `dt * speed_factor` while
/// running; during a stop hold only the wall clock moves.
#[derive(Debug, Clone)]
pub struct SimulationPlayer {
    settings: PlaybackSettings,
    path: Arc<PlannedPath>,
    waypoints: Vec<Waypoint>,

    state: PlaybackState,
    current_index: usize,
    simulated_time: f64,
    /// Sum of every `dt` passed to `tick`.
    wall_clock: f64,
    /// Index into `waypoints` of the stop that was handled most recently.
    last_stop_waypoint: Option<usize>,
    stop_timer: Option<StopTimer>,
    /// Bumped by every play/stop/load so stale timers can be recognized.
    generation: u64,

    pose: RobotPose,
    history: History,
}

impl SimulationPlayer {
    pub fn new(settings: PlaybackSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            path: Arc::new(PlannedPath::empty()),
            waypoints: Vec::new(),
            state: PlaybackState::Idle,
            current_index: 0,
            simulated_time: 0.0,
            wall_clock: 0.0,
            last_stop_waypoint: None,
            stop_timer: None,
            generation: 0,
            pose: RobotPose::default(),
            history: History::new(),
        }
    }

    /// Swaps in a freshly planned path. Any run in progress is cancelled and
    /// the pose snaps to the new start.
    pub fn load(&mut self, path: Arc<PlannedPath>, waypoints: Vec<Waypoint>) {
        self.cancel_run();
        self.path = path;
        self.waypoints = waypoints;
        self.current_index = 0;
        self.simulated_time = 0.0;
        self.last_stop_waypoint = None;
        self.history.clear();
        self.pose = match self.path.points.first() {
            Some(first) => self.start_pose(first),
            None => RobotPose::default(),
        };
    }

    // --- Accessors ---

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn pose(&self) -> &RobotPose {
        &self.pose
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn path(&self) -> &Arc<PlannedPath> {
        &self.path
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn set_speed_factor(&mut self, speed_factor: f64) {
        self.settings.speed_factor = non_negative(speed_factor);
    }

    /// Wall-clock seconds left on the current stop hold, if holding.
    pub fn stop_time_remaining(&self) -> Option<f64> {
        self.stop_timer
            .filter(|timer| timer.generation == self.generation)
            .map(|timer| (timer.deadline - self.wall_clock).max(0.0))
    }

    // --- Transitions ---

    /// Starts a run from the beginning of the path. A no-op while a run is
    /// already active; from `Idle` or `Finished` it replays from scratch.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.state.is_active() {
            return Ok(());
        }

        let len = self.path.points.len();
        if len < 2 {
            return Err(PlaybackError::InsufficientPath { len });
        }

        self.generation += 1;
        self.current_index = 0;
        self.simulated_time = 0.0;
        self.last_stop_waypoint = None;
        self.stop_timer = None;
        self.history.clear();

        let first = self.path.points[0];
        self.pose = self.start_pose(&first);
        self.history.record(0.0, self.pose);
        self.state = PlaybackState::Running;

        info!(
            "Playback started: {} samples, {:.3} s of path",
            len,
            self.path.duration()
        );
        Ok(())
    }

    /// Ends the run. The last pose and the history are kept for inspection.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Idle {
            info!(
                "Playback stopped at t = {:.3} s (index {})",
                self.simulated_time, self.current_index
            );
        }
        self.cancel_run();
    }

    /// Advances the player by `dt` seconds of real time and returns the
    /// resulting state.
    pub fn tick(&mut self, dt: f64) -> Result<PlaybackState, PlaybackError> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.wall_clock += dt;

        match self.state {
            PlaybackState::Idle | PlaybackState::Finished => Ok(self.state),
            PlaybackState::PausedAtStop => {
                self.poll_stop_timer();
                Ok(self.state)
            }
            PlaybackState::Running => self.advance(dt * self.settings.speed_factor),
        }
    }

    /// Jumps the pose to `time` seconds into the path without touching the
    /// playback state or the stop logic. Only allowed while no run is active.
    pub fn scrub(&mut self, time: f64) -> Result<RobotPose, PlaybackError> {
        if self.state.is_active() {
            return Err(PlaybackError::ScrubWhilePlaying);
        }

        let path = Arc::clone(&self.path);
        let len = path.points.len();
        if len == 0 {
            return Err(PlaybackError::InsufficientPath { len });
        }

        let time = if time.is_finite() {
            time.clamp(0.0, path.duration())
        } else {
            0.0
        };
        let index = path.points.partition_point(|p| p.time < time).min(len - 1);
        let point = path
            .points
            .get(index)
            .copied()
            .ok_or(PlaybackError::MissingPathPoint { index })?;

        self.simulated_time = time;
        self.current_index = index;
        self.pose = RobotPose {
            x: point.x,
            y: point.y,
            rotation: interpolate_heading(&path.heading_targets, point.s, self.pose.rotation),
            velocity: point.velocity,
            angular_velocity: 0.0,
        };
        Ok(self.pose)
    }

    // --- Private Helper Methods ---

    fn advance(&mut self, sim_dt: f64) -> Result<PlaybackState, PlaybackError> {
        self.simulated_time += sim_dt;

        let path = Arc::clone(&self.path);
        let points = &path.points;
        let sim_time = self.simulated_time;

        let index = points.partition_point(|p| p.time < sim_time);
        if index >= points.len() {
            return match points.last() {
                Some(last) => Ok(self.finish(last, &path)),
                None => Err(self.abort(index)),
            };
        }

        let Some(point) = points.get(index).copied() else {
            return Err(self.abort(index));
        };

        let previous_rotation = self.pose.rotation;
        let rotation = interpolate_heading(&path.heading_targets, point.s, previous_rotation);
        let angular_velocity = if sim_dt > 0.0 {
            shortest_angle_diff_deg(previous_rotation, rotation) / sim_dt
        } else {
            0.0
        };

        self.current_index = index;
        self.pose = RobotPose {
            x: point.x,
            y: point.y,
            rotation,
            velocity: point.velocity,
            angular_velocity,
        };

        if let Some(waypoint_index) = self.stop_trigger(&point) {
            self.enter_stop(waypoint_index, &point);
        }

        self.history.record(self.simulated_time, self.pose);
        Ok(self.state)
    }

    /// The stop waypoint this sample should hold at, if any.
    fn stop_trigger(&self, point: &PathPoint) -> Option<usize> {
        if point.velocity >= STOP_TRIGGER_VELOCITY {
            return None;
        }
        self.waypoints
            .iter()
            .enumerate()
            .filter(|(_, wp)| wp.stop_at_waypoint && !wp.is_guide_point)
            .find(|(i, wp)| {
                Some(*i) != self.last_stop_waypoint
                    && wp.distance_to(point.x, point.y) < STOP_TRIGGER_RADIUS_FACTOR * wp.radius
            })
            .map(|(i, _)| i)
    }

    fn enter_stop(&mut self, waypoint_index: usize, point: &PathPoint) {
        let waypoint = &self.waypoints[waypoint_index];
        let duration = waypoint
            .stop_duration
            .unwrap_or(self.settings.default_stop_duration)
            .max(0.0);

        self.last_stop_waypoint = Some(waypoint_index);
        self.pose.rotation = waypoint.wrapped_heading().unwrap_or(point.heading);
        self.pose.velocity = 0.0;
        self.pose.angular_velocity = 0.0;
        self.stop_timer = Some(StopTimer {
            deadline: self.wall_clock + duration,
            generation: self.generation,
        });
        self.state = PlaybackState::PausedAtStop;

        info!(
            "Holding at stop waypoint {} for {:.2} s (t = {:.3} s)",
            waypoint_index, duration, self.simulated_time
        );
    }

    /// Resumes once the hold timer of the current run has elapsed. The tick
    /// that resumes does not advance simulated time, so paused wall time is
    /// never replayed.
    fn poll_stop_timer(&mut self) {
        let Some(timer) = self.stop_timer else {
            return;
        };
        if timer.generation != self.generation {
            self.stop_timer = None;
            return;
        }
        if self.wall_clock >= timer.deadline {
            self.stop_timer = None;
            self.state = PlaybackState::Running;
            info!("Stop hold finished, resuming at t = {:.3} s", self.simulated_time);
        }
    }

    fn finish(&mut self, last: &PathPoint, path: &PlannedPath) -> PlaybackState {
        self.current_index = path.points.len() - 1;
        self.pose = RobotPose {
            x: last.x,
            y: last.y,
            rotation: interpolate_heading(&path.heading_targets, last.s, self.pose.rotation),
            velocity: 0.0,
            angular_velocity: 0.0,
        };
        self.history.record(self.simulated_time, self.pose);
        self.state = PlaybackState::Finished;
        info!("Playback finished at t = {:.3} s", self.simulated_time);
        self.state
    }

    fn abort(&mut self, index: usize) -> PlaybackError {
        error!("No path point at index {}; stopping playback", index);
        self.cancel_run();
        PlaybackError::MissingPathPoint { index }
    }

    fn cancel_run(&mut self) {
        self.state = PlaybackState::Idle;
        self.stop_timer = None;
        self.generation += 1;
    }

    fn start_pose(&self, first: &PathPoint) -> RobotPose {
        let rotation = self
            .waypoints
            .first()
            .and_then(Waypoint::wrapped_heading)
            .or_else(|| self.path.heading_targets.first().map(|t| t.heading))
            .unwrap_or(0.0);
        RobotPose {
            x: first.x,
            y: first.y,
            rotation,
            velocity: first.velocity,
            angular_velocity: 0.0,
        }
    }
}

impl Default for SimulationPlayer {
    fn default() -> Self {
        Self::new(PlaybackSettings::default())
    }
}
