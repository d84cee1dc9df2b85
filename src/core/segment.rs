use serde::{Deserialize, Serialize};

/// One timed unit of a story: a single image with an optional caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Opaque media handle (usually an image URL)
    pub media_ref: String,

    /// Text shown over the image, if any
    #[serde(default)]
    pub caption: Option<String>,

    /// Position assigned by the author
    #[serde(default)]
    pub order: u32,
}

impl Segment {
    /// Create a new segment without a caption
    pub fn new(media_ref: impl Into<String>, order: u32) -> Self {
        Self {
            media_ref: media_ref.into(),
            caption: None,
            order,
        }
    }

    /// Attach a caption
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Caption text, treating blank captions as absent
    pub fn caption_text(&self) -> Option<&str> {
        self.caption
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
