// waypath_sim/src/simulation/utils/scheduling.rs

use std::thread;
use std::time::{Duration, Instant};

/// Paces a loop at a fixed frequency and reports the real time that elapsed
/// between consecutive ticks.
#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    last_tick: Instant,
}

impl TickScheduler {
    /// Returns `None` if the rate is zero, negative or not a number.
    pub fn new(rate_hz: f64) -> Option<Self> {
        if !(rate_hz.is_finite() && rate_hz > 0.0) {
            return None;
        }
        Some(Self {
            period: Duration::from_secs_f64(1.0 / rate_hz),
            last_tick: Instant::now(),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleeps until one period has passed since the previous tick and
    /// returns the actual elapsed time in seconds. A late tick returns
    /// immediately with the longer delta.
    pub fn wait_for_next_tick(&mut self) -> f64 {
        let target = self.last_tick + self.period;
        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        elapsed.as_secs_f64()
    }

    /// Forgets the time spent since the last tick, so the next delta starts now.
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}
