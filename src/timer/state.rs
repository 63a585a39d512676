use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::format_elapsed;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchState {
    /// Time accumulated up to `last_resume`; never decreases while running.
    pub elapsed_ms: u64,
    pub running: bool,
    #[serde(skip)]
    pub last_resume: Option<Instant>,
}

impl StopwatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the stopwatch was already running.
    pub fn resume(&mut self, now: Instant) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.last_resume = Some(now);
        true
    }

    /// Folds the time since the last resume into `elapsed_ms` and re-anchors.
    pub fn accumulate(&mut self, now: Instant) {
        if let (true, Some(anchor)) = (self.running, self.last_resume) {
            self.elapsed_ms = self.elapsed_ms.saturating_add(millis_between(anchor, now));
            self.last_resume = Some(now);
        }
    }

    /// Returns `false` when the stopwatch was not running.
    pub fn pause(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        self.accumulate(now);
        self.running = false;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Elapsed time including the not yet accumulated running window.
    pub fn current_elapsed_ms(&self, now: Instant) -> u64 {
        match (self.running, self.last_resume) {
            (true, Some(anchor)) => self.elapsed_ms.saturating_add(millis_between(anchor, now)),
            _ => self.elapsed_ms,
        }
    }

    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed_ms)
    }
}

fn millis_between(earlier: Instant, later: Instant) -> u64 {
    u64::try_from(later.saturating_duration_since(earlier).as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn pause_freezes_accumulated_time() {
        let start = Instant::now();
        let mut state = StopwatchState::new();
        assert!(state.resume(start));
        assert!(!state.resume(start + Duration::from_millis(10)));

        state.accumulate(start + Duration::from_millis(1_200));
        assert_eq!(state.elapsed_ms, 1_200);

        assert!(state.pause(start + Duration::from_millis(2_500)));
        assert_eq!(state.elapsed_ms, 2_500);
        assert!(!state.pause(start + Duration::from_millis(9_000)));
        assert_eq!(state.current_elapsed_ms(start + Duration::from_millis(9_000)), 2_500);
    }

    #[test]
    fn current_elapsed_includes_running_window() {
        let start = Instant::now();
        let mut state = StopwatchState::new();
        state.resume(start);
        assert_eq!(state.current_elapsed_ms(start + Duration::from_millis(750)), 750);
        assert_eq!(state.elapsed_ms, 0);
    }

    #[test]
    fn reset_clears_everything() {
        let start = Instant::now();
        let mut state = StopwatchState::new();
        state.resume(start);
        state.pause(start + Duration::from_secs(61));
        assert_eq!(state.formatted(), "00:01:01");

        state.reset();
        assert_eq!(state.elapsed_ms, 0);
        assert!(!state.running);
        assert!(state.last_resume.is_none());
        assert_eq!(state.formatted(), "00:00:00");
    }
}
