pub mod gesture;

pub use gesture::{page_at, zone_at, Gesture, GestureTracker, TouchZone};

use anyhow::{Context, Result};
use crate::core::Story;
use std::path::Path;
use tracing::{debug, warn};

/// Parse a resolved story from its JSON representation
pub fn parse_story(json: &str) -> Result<Story> {
    let story: Story = serde_json::from_str(json).context("Failed to parse story JSON")?;

    if !story.is_ordered() {
        warn!("Story {} items are not sorted by order; playing them as given", story.id);
    }
    debug!("Parsed story {} with {} items", story.id, story.len());

    Ok(story)
}

/// Load a story from a JSON file on disk
pub fn load_story<P: AsRef<Path>>(path: P) -> Result<Story> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read story file: {:?}", path))?;
    parse_story(&content).with_context(|| format!("Invalid story file: {:?}", path))
}
