//! Relation and schema resolution.

pub mod join;
pub mod schema;

pub use join::{JoinResolver, PivotJoin, ResolvedJoin};
pub use schema::{ResolvedEntity, ResolvedSchema};
