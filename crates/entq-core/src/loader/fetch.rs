//! Fetch function boundaries.
//!
//! Loaders never talk to storage themselves. They are constructed around
//! caller-supplied batch-fetch functions and only define the batching and
//! caching contract around them. [`RowSource`] is the minimal storage
//! surface the stock wiring in [`LoaderSet`](crate::loader::LoaderSet)
//! builds those functions from.

use std::collections::HashMap;
use std::sync::Arc;

use entq_schema::EntityRow;

use crate::error::Result;

/// Batch fetch for single-value loaders: keys in, at most one row per key
/// out. Keys absent from the returned map are treated as having no match.
pub type SingleFetchFn =
    Arc<dyn Fn(&[String]) -> Result<HashMap<String, EntityRow>> + Send + Sync>;

/// Batch fetch for group loaders: keys in, any number of rows per key out.
pub type GroupFetchFn =
    Arc<dyn Fn(&[String]) -> Result<HashMap<String, Vec<EntityRow>>> + Send + Sync>;

/// Pivot-link fetch: `(table, source_column, target_column, keys)` in,
/// `(source_key, target_key)` pairs out for every pivot row whose source
/// column matches one of the keys.
pub type PivotFetchFn =
    Arc<dyn Fn(&str, &str, &str, &[String]) -> Result<Vec<(String, String)>> + Send + Sync>;

/// A backing store that can answer column-equality batch queries.
pub trait RowSource: Send + Sync {
    /// All rows of `table` whose `column` value matches one of `keys`.
    /// Return order carries no meaning.
    fn rows_by_column(&self, table: &str, column: &str, keys: &[String])
        -> Result<Vec<EntityRow>>;

    /// All `(source, target)` key pairs in the pivot `table` whose
    /// `source_column` matches one of `keys`.
    fn pivot_links(
        &self,
        table: &str,
        source_column: &str,
        target_column: &str,
        keys: &[String],
    ) -> Result<Vec<(String, String)>>;
}
