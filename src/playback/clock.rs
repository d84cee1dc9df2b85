use std::fmt;
use std::time::Duration;

/// Identity of one scheduled advancement clock
///
/// Ids are never reused within a session, so a tick carrying an old id can
/// always be told apart from a tick for the live clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockId(pub(crate) u64);

impl fmt::Display for ClockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clock#{}", self.0)
    }
}

/// Result of feeding elapsed time into a clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockTick {
    /// Still running, with the new progress fraction
    Running(f64),
    /// The segment ran out
    Finished,
}

/// Advancement clock for the active segment
///
/// Started from a base progress; it runs for the remaining share of the
/// segment duration and interpolates progress from the base towards `1`.
#[derive(Debug, Clone)]
pub struct AdvanceClock {
    id: ClockId,
    base_progress: f64,
    remaining: Duration,
    elapsed: Duration,
}

impl AdvanceClock {
    /// Start a clock that completes `(1 - base_progress) * segment_duration` from now
    pub fn start(id: ClockId, base_progress: f64, segment_duration: Duration) -> Self {
        let base_progress = base_progress.clamp(0.0, 1.0);
        Self {
            id,
            base_progress,
            remaining: segment_duration.mul_f64(1.0 - base_progress),
            elapsed: Duration::ZERO,
        }
    }

    pub fn id(&self) -> ClockId {
        self.id
    }

    /// Total time this clock was scheduled for
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Time left until the segment completes
    pub fn time_left(&self) -> Duration {
        self.remaining.saturating_sub(self.elapsed)
    }

    pub fn progress(&self) -> f64 {
        if self.remaining.is_zero() {
            return 1.0;
        }
        let ratio = (self.elapsed.as_secs_f64() / self.remaining.as_secs_f64()).min(1.0);
        (self.base_progress + (1.0 - self.base_progress) * ratio).clamp(0.0, 1.0)
    }

    /// Feed elapsed frame time into the clock
    pub fn advance(&mut self, delta: Duration) -> ClockTick {
        self.elapsed = self.elapsed.saturating_add(delta).min(self.remaining);
        if self.elapsed >= self.remaining {
            ClockTick::Finished
        } else {
            ClockTick::Running(self.progress())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEGMENT: Duration = Duration::from_millis(3000);

    #[test]
    fn test_fresh_clock_runs_full_duration() {
        let mut clock = AdvanceClock::start(ClockId(1), 0.0, SEGMENT);
        assert_eq!(clock.remaining(), SEGMENT);

        assert_eq!(clock.advance(Duration::from_millis(1500)), ClockTick::Running(0.5));
        assert_eq!(clock.time_left(), Duration::from_millis(1500));
        assert_eq!(clock.advance(Duration::from_millis(1500)), ClockTick::Finished);
    }

    #[test]
    fn test_resumed_clock_runs_remaining_share() {
        let mut clock = AdvanceClock::start(ClockId(2), 0.25, SEGMENT);
        assert_eq!(clock.remaining(), Duration::from_millis(2250));
        assert_eq!(clock.progress(), 0.25);

        match clock.advance(Duration::from_millis(750)) {
            ClockTick::Running(p) => assert!((p - 0.5).abs() < 1e-9, "progress was {}", p),
            ClockTick::Finished => panic!("finished early"),
        }
        assert_eq!(clock.advance(Duration::from_millis(1500)), ClockTick::Finished);
        assert_eq!(clock.progress(), 1.0);
    }

    #[test]
    fn test_clock_at_full_progress_finishes_on_first_tick() {
        let mut clock = AdvanceClock::start(ClockId(3), 1.0, SEGMENT);
        assert_eq!(clock.remaining(), Duration::ZERO);
        assert_eq!(clock.advance(Duration::ZERO), ClockTick::Finished);
    }
}
