//! Error types for the paragraph engine.
//!
//! Every public operation returns a [`Result`]. Success variants that carry
//! meaning (such as "end of line") live in the `Ok` value of the operation
//! concerned; this enum only covers failures.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias for paragraph operations.
pub type Result<T> = std::result::Result<T, ParagraphError>;

/// Failure taxonomy shared by the content model, width analysis and line
/// layout.
///
/// The `Display` strings double as the library's error-to-string table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParagraphError {
    /// An allocation failed. The failing operation leaves no partial
    /// mutation behind.
    #[error("Out of memory")]
    OutOfMemory,

    /// A required argument was invalid, e.g. a stale content handle or an
    /// inline end with no matching inline start.
    #[error("Bad parameter: {0}")]
    BadParam(&'static str),

    /// A raw content-type tag did not name any known content variant.
    #[error("Bad content type: {0}")]
    BadContentType(String),

    /// A client collaborator (text retrieval, measurement or a layout
    /// callback) reported a failure.
    #[error("Client error: {0}")]
    Client(String),
}

impl ParagraphError {
    /// Build a [`ParagraphError::Client`] from any displayable client error.
    pub fn client(err: impl std::fmt::Display) -> Self {
        Self::Client(err.to_string())
    }
}

impl From<TryReserveError> for ParagraphError {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}
