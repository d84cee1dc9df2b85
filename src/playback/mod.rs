pub mod clock;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod observer;

pub use clock::{AdvanceClock, ClockId};
pub use engine::PlaybackController;
pub use error::InvalidSessionError;
pub use observer::{Observers, SubscriptionId};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time each segment stays on screen
pub const DEFAULT_SEGMENT_DURATION_MS: u64 = 3000;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
    /// Terminal; every operation is ignored from here on
    Closed,
}

/// What happens when the last segment runs out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfSequence {
    /// Wrap around to the first segment and keep playing
    #[default]
    Loop,
    /// Emit a final closed snapshot and dispose the session
    Close,
}

impl std::str::FromStr for EndOfSequence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "loop" => Ok(Self::Loop),
            "close" => Ok(Self::Close),
            other => Err(format!("unknown end-of-sequence policy: {}", other)),
        }
    }
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Duration applied to every segment
    pub segment_duration_ms: u64,
    pub end_of_sequence: EndOfSequence,
    /// Image cross-fade after an index change
    pub image_fade_ms: u64,
    /// Header fade when the viewer opens
    pub header_fade_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            segment_duration_ms: DEFAULT_SEGMENT_DURATION_MS,
            end_of_sequence: EndOfSequence::Loop,
            image_fade_ms: 600,
            header_fade_ms: 500,
        }
    }
}

impl PlaybackConfig {
    pub fn segment_duration(&self) -> Duration {
        Duration::from_millis(self.segment_duration_ms)
    }

    pub fn image_fade(&self) -> Duration {
        Duration::from_millis(self.image_fade_ms)
    }

    pub fn header_fade(&self) -> Duration {
        Duration::from_millis(self.header_fade_ms)
    }
}

/// State handed to observers after every transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_index: usize,
    /// Elapsed fraction of the current segment, in `[0, 1]`
    pub progress: f64,
    pub paused: bool,
    pub state: PlaybackState,
}

impl Snapshot {
    pub fn is_closed(&self) -> bool {
        self.state == PlaybackState::Closed
    }

    /// Indicator fill for segment `k`, in percent
    pub fn segment_fill(&self, k: usize) -> f64 {
        indicator::segment_fill(k, self.current_index, self.progress)
    }

    /// Indicator fills for a sequence of `len` segments, in percent
    pub fn indicator_fills(&self, len: usize) -> Vec<f64> {
        (0..len).map(|k| self.segment_fill(k)).collect()
    }
}
