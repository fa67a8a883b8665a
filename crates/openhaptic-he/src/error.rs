//! Error types for HE document handling.

use thiserror::Error;

/// Errors produced while reading or writing HE documents.
///
/// Format and I/O failures are deliberately distinct: a caller loading an
/// effect from disk needs to tell a missing file apart from a corrupt one.
#[derive(Debug, Error)]
pub enum EffectError {
    /// The text is not a structurally valid HE document.
    #[error("malformed HE document: {0}")]
    Format(#[from] serde_json::Error),

    /// Reading or writing the backing file failed.
    #[error("effect file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl EffectError {
    /// Whether this failure came from the document structure rather than
    /// the filesystem.
    pub fn is_format(&self) -> bool {
        matches!(self, EffectError::Format(_))
    }
}
