use crate::core::Segment;
use crate::playback::indicator::fade_opacity;
use crate::playback::clock::{AdvanceClock, ClockId, ClockTick};
use crate::playback::{
    EndOfSequence, InvalidSessionError, Observers, PlaybackConfig, PlaybackState, Snapshot,
    SubscriptionId,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Playback controller for a story session
///
/// Owns the current index, the frozen or running progress and the single
/// advancement clock. Time only moves through [`tick`](Self::tick), which the
/// host calls once per frame with the elapsed frame time.
#[derive(Debug)]
pub struct PlaybackController {
    segments: Arc<[Segment]>,
    config: PlaybackConfig,
    state: PlaybackState,
    current_index: usize,
    progress: f64,
    /// Frame time since the index last changed, paused or not
    since_index_change: Duration,
    clock: Option<AdvanceClock>,
    next_clock_id: u64,
    observers: Observers,
}

impl PlaybackController {
    /// Start a session in `Playing(0)`
    pub fn new(
        segments: impl Into<Arc<[Segment]>>,
        config: PlaybackConfig,
    ) -> Result<Self, InvalidSessionError> {
        let segments = segments.into();
        if segments.is_empty() {
            return Err(InvalidSessionError::NoSegments);
        }
        if config.segment_duration_ms == 0 {
            return Err(InvalidSessionError::ZeroDuration);
        }

        info!(
            "Starting playback session: {} segments, {} ms each, end={:?}",
            segments.len(),
            config.segment_duration_ms,
            config.end_of_sequence
        );

        let mut controller = Self {
            segments,
            config,
            state: PlaybackState::Playing,
            current_index: 0,
            progress: 0.0,
            since_index_change: Duration::ZERO,
            clock: None,
            next_clock_id: 0,
            observers: Observers::new(),
        };
        controller.start_clock();
        Ok(controller)
    }

    /// Start a session with the default configuration
    pub fn with_defaults(
        segments: impl Into<Arc<[Segment]>>,
    ) -> Result<Self, InvalidSessionError> {
        Self::new(segments, PlaybackConfig::default())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_segment(&self) -> &Segment {
        &self.segments[self.current_index]
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    pub fn is_closed(&self) -> bool {
        self.state == PlaybackState::Closed
    }

    /// Id of the running advancement clock, if any
    pub fn active_clock(&self) -> Option<ClockId> {
        self.clock.as_ref().map(AdvanceClock::id)
    }

    /// Frame time elapsed since the current segment was entered
    pub fn since_index_change(&self) -> Duration {
        self.since_index_change
    }

    /// Opacity of the current image; the fade restarts on every index change
    /// and keeps running while paused
    pub fn image_opacity(&self) -> f64 {
        fade_opacity(self.since_index_change, self.config.image_fade())
    }

    /// Time until the current segment completes, if a clock is running
    pub fn time_left(&self) -> Option<Duration> {
        self.clock.as_ref().map(AdvanceClock::time_left)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_index: self.current_index,
            progress: self.progress,
            paused: self.state == PlaybackState::Paused,
            state: self.state,
        }
    }

    /// Register an observer for future snapshots
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Freeze progress and cancel the clock
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.cancel_clock();
        self.state = PlaybackState::Paused;
        debug!("Paused at segment {} ({:.3})", self.current_index, self.progress);
        self.emit();
    }

    /// Continue from the frozen progress for the remaining share of the duration
    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        self.state = PlaybackState::Playing;
        self.start_clock();
        debug!("Resumed segment {} at {:.3}", self.current_index, self.progress);
        self.emit();
    }

    /// Move to the next segment and play; no-op at the last segment
    pub fn skip_forward(&mut self) {
        if self.is_closed() || self.current_index + 1 >= self.segments.len() {
            return;
        }
        self.enter_segment(self.current_index + 1);
    }

    /// Move to the previous segment and play; no-op at the first segment
    pub fn skip_backward(&mut self) {
        if self.is_closed() || self.current_index == 0 {
            return;
        }
        self.enter_segment(self.current_index - 1);
    }

    /// Land on segment `index` after a page swipe
    ///
    /// Keeps the pause state: a paused session stays paused on the new segment.
    /// Jumping to the current index or outside the sequence does nothing.
    pub fn jump_to(&mut self, index: usize) {
        if self.is_closed() || index == self.current_index {
            return;
        }
        if index >= self.segments.len() {
            warn!(
                "Ignoring jump to segment {} (story has {})",
                index,
                self.segments.len()
            );
            return;
        }

        if self.state == PlaybackState::Paused {
            self.current_index = index;
            self.progress = 0.0;
            self.since_index_change = Duration::ZERO;
            debug!("Jumped to segment {} while paused", index);
            self.emit();
        } else {
            self.enter_segment(index);
        }
    }

    /// Feed one frame of elapsed time into the active clock
    ///
    /// Also advances the image fade, which runs even while paused.
    pub fn tick(&mut self, delta: Duration) {
        if self.is_closed() {
            return;
        }
        self.since_index_change = self.since_index_change.saturating_add(delta);
        if let Some(id) = self.active_clock() {
            self.tick_clock(id, delta);
        }
    }

    /// Feed elapsed time into a specific clock; ticks for a cancelled clock are ignored
    pub fn tick_clock(&mut self, id: ClockId, delta: Duration) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(clock) = self.clock.as_mut().filter(|c| c.id() == id) else {
            return;
        };

        match clock.advance(delta) {
            ClockTick::Running(progress) => {
                if progress > self.progress {
                    self.progress = progress;
                    self.emit();
                }
            }
            ClockTick::Finished => self.finish_segment(),
        }
    }

    /// Cancel the clock and close the session without emitting
    pub fn dispose(&mut self) {
        if self.is_closed() {
            return;
        }
        self.close();
        self.observers.clear();
    }

    fn finish_segment(&mut self) {
        let next = self.current_index + 1;
        if next < self.segments.len() {
            self.enter_segment(next);
            return;
        }

        match self.config.end_of_sequence {
            EndOfSequence::Loop => {
                debug!("Reached end of story, wrapping to first segment");
                self.enter_segment(0);
            }
            EndOfSequence::Close => {
                self.progress = 1.0;
                self.close();
                self.emit();
                self.observers.clear();
            }
        }
    }

    fn enter_segment(&mut self, index: usize) {
        self.cancel_clock();
        self.current_index = index;
        self.progress = 0.0;
        self.since_index_change = Duration::ZERO;
        self.state = PlaybackState::Playing;
        self.start_clock();
        debug!("Playing segment {}/{}", index + 1, self.segments.len());
        self.emit();
    }

    fn close(&mut self) {
        self.cancel_clock();
        self.state = PlaybackState::Closed;
        info!("Playback session closed at segment {}", self.current_index);
    }

    // A lone looping segment is shown statically and never advances
    fn start_clock(&mut self) {
        self.cancel_clock();
        if self.segments.len() < 2 && self.config.end_of_sequence == EndOfSequence::Loop {
            return;
        }
        let id = ClockId(self.next_clock_id);
        self.next_clock_id += 1;
        self.clock = Some(AdvanceClock::start(
            id,
            self.progress,
            self.config.segment_duration(),
        ));
    }

    fn cancel_clock(&mut self) {
        self.clock = None;
    }

    fn emit(&mut self) {
        let snapshot = self.snapshot();
        self.observers.notify(&snapshot);
    }
}
