// waypath_core/src/playback/history.rs

use crate::types::{HistorySample, RobotPose};

/// Append-only pose history keyed by simulated time.
///
/// A sample whose time equals the last recorded time is dropped, not merged:
/// the first pose recorded for a given instant wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    samples: Vec<HistorySample>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the sample was dropped as a duplicate instant.
    pub fn record(&mut self, time: f64, pose: RobotPose) -> bool {
        if self.samples.last().is_some_and(|last| last.time == time) {
            return false;
        }
        self.samples.push(HistorySample { time, pose });
        true
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn samples(&self) -> &[HistorySample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&HistorySample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_time_sample_is_dropped() {
        let mut history = History::new();
        let first = RobotPose {
            x: 1.0,
            ..RobotPose::default()
        };
        let second = RobotPose {
            x: 2.0,
            ..RobotPose::default()
        };

        assert!(history.record(0.5, first));
        assert!(!history.record(0.5, second));
        assert_eq!(history.len(), 1);
        assert_eq!(history.last().unwrap().pose.x, 1.0);

        assert!(history.record(0.6, second));
        assert_eq!(history.len(), 2);
    }
}
