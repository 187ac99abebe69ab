/// Convenience result type used across overlayer.
pub type OverlayerResult<T> = Result<T, OverlayerError>;

/// Top-level error taxonomy used by session, loader and compositor APIs.
///
/// Display strings of the user-facing variants are the messages shown to the
/// person operating the editor.
#[derive(thiserror::Error, Debug)]
pub enum OverlayerError {
    /// The provided file is not an image (MIME type outside `image/`).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Export was attempted before any background was loaded.
    #[error("Please upload a background image first.")]
    NoBackground,

    /// An overlay is selected but its raster is not available.
    #[error("Error loading the overlay image: {0}")]
    OverlayUnavailable(String),

    /// Invalid configuration or geometry preconditions.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayerError {
    /// Build an [`OverlayerError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build an [`OverlayerError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`OverlayerError::OverlayUnavailable`] value.
    pub fn overlay_unavailable(msg: impl Into<String>) -> Self {
        Self::OverlayUnavailable(msg.into())
    }

    /// Build an [`OverlayerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OverlayerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for OverlayerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
