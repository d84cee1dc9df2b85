use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Roughly one frame at 60 Hz
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Source of animation frames for a playback host
///
/// This trait lets the host run against a real timer or a test clock:
/// - `IntervalClock` ticks on a tokio interval
/// - `ManualClock` is stepped by hand from tests
#[async_trait]
pub trait FrameClock: Send {
    /// Wait for the next frame and return the time elapsed since the previous one.
    /// Returns `None` once the clock has stopped for good.
    async fn next_frame(&mut self) -> Option<Duration>;
}

/// Frame clock backed by a tokio interval
pub struct IntervalClock {
    interval: Interval,
    last: Option<Instant>,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            last: None,
        }
    }
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

#[async_trait]
impl FrameClock for IntervalClock {
    async fn next_frame(&mut self) -> Option<Duration> {
        let now = self.interval.tick().await;
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_interval_clock_reports_frame_deltas() {
        let mut clock = IntervalClock::new(Duration::from_millis(20));

        assert_eq!(clock.next_frame().await, Some(Duration::ZERO));
        assert_eq!(clock.next_frame().await, Some(Duration::from_millis(20)));
        assert_eq!(clock.next_frame().await, Some(Duration::from_millis(20)));
    }
}
