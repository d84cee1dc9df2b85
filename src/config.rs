use anyhow::{Context, Result};
use crate::playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Persistent viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub playback: PlaybackConfig,
    /// Time between animation frames
    pub frame_interval_ms: u64,
    /// Width of each indicator bar in the text renderer
    pub bar_width: usize,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            frame_interval_ms: 16,
            bar_width: 10,
        }
    }
}

impl ViewerSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("story-reel").join("settings.json"))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Parse settings from JSON, filling missing fields with defaults
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse viewer settings")
    }

    /// Load settings from an explicit file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        Self::parse(&contents)
    }

    /// Load settings from the user config directory, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!("No settings at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring unreadable settings {:?}: {:#}", path, e);
                Self::default()
            }
        }
    }
}
