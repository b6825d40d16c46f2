//! entq core - Join resolution, criteria indexing, and batched loading.
//!
//! This crate turns sparse relation declarations into complete join
//! facts, indexes the filter/sort paths those joins open up, and wires
//! per-operation loaders that batch and cache the row lookups needed to
//! resolve nested relations.

pub mod criteria;
pub mod error;
pub mod loader;
pub mod resolve;

pub use criteria::{CriteriaField, CriteriaIndex};
pub use error::{Error, Result};
pub use loader::{
    GroupFetchFn, GroupLoader, Loader, LoaderSet, LoaderStats, PivotFetchFn, RelationLoader,
    RowSource, SingleFetchFn,
};
pub use resolve::{JoinResolver, PivotJoin, ResolvedEntity, ResolvedJoin, ResolvedSchema};

/// Re-export schema declaration types.
pub use entq_schema as schema;
