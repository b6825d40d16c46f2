//! Errors for schema document handling.

use thiserror::Error;

/// Errors raised while reading a schema document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is not valid JSON or does not match the schema shape.
    #[error("invalid schema document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two entities in the document share a name.
    #[error("duplicate entity name: {0}")]
    DuplicateEntity(String),
}
