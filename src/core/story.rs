use crate::core::Segment;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Label used when an author has no display name
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Author of a story
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub display_name: Option<String>,

    /// Avatar image handle
    #[serde(default)]
    pub avatar_ref: Option<String>,
}

impl Author {
    /// Name to show in the viewer header and the story carousel
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR)
    }
}

/// A resolved story as handed over by the data layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,

    #[serde(default)]
    pub author: Author,

    /// Segments, expected to be sorted by `order` already
    #[serde(default)]
    pub items: Vec<Segment>,
}

impl Story {
    /// Header title: the caption of the first item
    pub fn title(&self) -> &str {
        self.items
            .first()
            .and_then(|s| s.caption_text())
            .unwrap_or("")
    }

    /// Check whether items are sorted by their `order` field
    pub fn is_ordered(&self) -> bool {
        self.items.windows(2).all(|w| w[0].order <= w[1].order)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read-only segment list to share with a playback session
    pub fn segments(&self) -> Arc<[Segment]> {
        Arc::from(self.items.as_slice())
    }
}
