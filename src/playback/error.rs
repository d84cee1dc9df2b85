use thiserror::Error;

/// Reasons a playback session cannot be created
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSessionError {
    #[error("story has no segments")]
    NoSegments,

    #[error("segment duration must be greater than zero")]
    ZeroDuration,
}
