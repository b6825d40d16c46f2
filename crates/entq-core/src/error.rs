//! Core error types.

use thiserror::Error;

/// Errors raised while resolving schemas or loading rows.
#[derive(Debug, Error)]
pub enum Error {
    /// A relation points at an entity the schema does not declare.
    #[error("relation {entity}.{field} targets unknown entity {target}")]
    UnknownTarget {
        /// Entity declaring the relation.
        entity: String,
        /// Relation field name.
        field: String,
        /// The missing target entity.
        target: String,
    },

    /// An entity has no scalar field to serve as its key.
    #[error("entity {0} has no key field")]
    MissingPrimaryKey(String),

    /// A batch fetch against the row source failed.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Convenience result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
