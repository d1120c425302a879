use std::time::{Duration, Instant};

/// Wall-clock playback position: time accumulated while paused plus the
/// running segment since the last resume.
#[derive(Debug, Default)]
pub(super) struct PlayClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlayClock {
    /// Stop the clock and set its position to `at`.
    pub(super) fn reset(&mut self, at: Duration) {
        self.started_at = None;
        self.accumulated = at;
    }

    pub(super) fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    pub(super) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub(super) fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}
