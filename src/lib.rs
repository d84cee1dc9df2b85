//! Playback controller for ephemeral stories: ordered image segments shown for
//! a fixed duration each, with per-segment progress, touch navigation and
//! wraparound at the end of the sequence.

pub mod config;
pub mod core;
pub mod driver;
pub mod input;
pub mod playback;

pub use config::ViewerSettings;
pub use core::{Author, Segment, Story};
pub use driver::StoryPlayer;
pub use playback::{
    EndOfSequence, InvalidSessionError, PlaybackConfig, PlaybackController, PlaybackState, Snapshot,
};
