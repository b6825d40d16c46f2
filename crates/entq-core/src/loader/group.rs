//! Group (multi-value) batched loader.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use entq_schema::{EntityRow, Value};

use crate::error::Result;
use crate::loader::dedup_keys;
use crate::loader::fetch::{GroupFetchFn, PivotFetchFn};
use crate::loader::single::Loader;
use crate::loader::stats::LoaderStats;
use crate::resolve::join::PivotJoin;

/// Batches and caches key-to-rows lookups for one operation.
///
/// Same contract as [`Loader`], except a key maps to a list of rows, and
/// every list is sorted ascending by `sort_column` before it is cached.
/// Keys with no rows map to an empty list.
pub struct GroupLoader {
    fetch: GroupFetchFn,
    sort_column: String,
    cache: Mutex<HashMap<String, Vec<EntityRow>>>,
    stats: LoaderStats,
}

impl GroupLoader {
    /// Create a group loader around a batch-fetch function. `sort_column`
    /// is the target entity's key column, which fixes the row order.
    pub fn new(sort_column: impl Into<String>, fetch: GroupFetchFn) -> Self {
        Self {
            fetch,
            sort_column: sort_column.into(),
            cache: Mutex::new(HashMap::new()),
            stats: LoaderStats::default(),
        }
    }

    /// Create a group loader that resolves a many-to-many relation.
    ///
    /// Its fetch runs in two sequential steps: one pivot-link query for
    /// the batch, then one batch load of the referenced targets through
    /// the target entity's shared by-key loader. Link rows whose target
    /// fails to load are dropped from the groups.
    pub fn many_to_many(
        pivot: &PivotJoin,
        sort_column: impl Into<String>,
        links: PivotFetchFn,
        targets: Arc<Loader>,
    ) -> Self {
        let pivot = pivot.clone();
        let fetch: GroupFetchFn = Arc::new(move |keys| {
            let links = links(
                &pivot.table,
                &pivot.source_column,
                &pivot.target_column,
                keys,
            )?;

            let mut seen = HashSet::new();
            let mut target_keys = Vec::new();
            for (_, target) in &links {
                if seen.insert(target.clone()) {
                    target_keys.push(target.clone());
                }
            }
            let loaded = targets.load_many(&target_keys)?;

            let mut groups: HashMap<String, Vec<EntityRow>> = HashMap::new();
            for (source, target) in links {
                if let Some(Some(row)) = loaded.get(&target) {
                    groups.entry(source).or_default().push(row.clone());
                }
            }
            Ok(groups)
        });

        Self::new(sort_column, fetch)
    }

    /// Load the row list for a single key. Empty when the key has no rows
    /// or is empty after trimming.
    pub fn load(&self, key: &str) -> Result<Vec<EntityRow>> {
        let keys = [key.to_string()];
        let mut result = self.load_many(&keys)?;
        Ok(result.remove(key.trim()).unwrap_or_default())
    }

    /// Load row lists for a batch of keys.
    ///
    /// The result covers every unique non-empty trimmed key in `keys`,
    /// each list sorted ascending by the sort column. A fetch error
    /// aborts the whole call and caches nothing.
    pub fn load_many(&self, keys: &[String]) -> Result<HashMap<String, Vec<EntityRow>>> {
        let keys = dedup_keys(keys);
        let mut results = HashMap::with_capacity(keys.len());
        let mut missing = Vec::new();

        {
            let cache = self.cache.lock();
            for key in keys {
                match cache.get(&key) {
                    Some(rows) => {
                        results.insert(key, rows.clone());
                    }
                    None => missing.push(key),
                }
            }
        }
        self.stats.record_hits(results.len() as u64);
        self.stats.record_misses(missing.len() as u64);

        if missing.is_empty() {
            return Ok(results);
        }

        // Same discipline as the single loader: fetch outside the lock,
        // merge idempotently afterwards.
        self.stats.record_fetch();
        tracing::trace!(keys = missing.len(), "group loader batch fetch");
        let mut fetched = (self.fetch)(&missing)?;

        let mut cache = self.cache.lock();
        for key in missing {
            let mut rows = fetched.remove(&key).unwrap_or_default();
            sort_rows(&mut rows, &self.sort_column);
            cache.insert(key.clone(), rows.clone());
            results.insert(key, rows);
        }
        Ok(results)
    }

    /// Counters for this instance.
    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }
}

/// Stable ascending sort by one column, rows without the column first.
fn sort_rows(rows: &mut [EntityRow], column: &str) {
    rows.sort_by(|a, b| compare_key_values(a.get(column), b.get(column)));
}

fn compare_key_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

/// Total order over column values. Nulls sort first, numeric widths
/// compare by value, mismatched variants compare equal.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int32(a), Value::Int32(b)) => a.cmp(b),
        (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
        (Value::Int32(a), Value::Int64(b)) => i64::from(*a).cmp(b),
        (Value::Int64(a), Value::Int32(b)) => a.cmp(&i64::from(*b)),
        (Value::Float32(a), Value::Float32(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Value::Float32(a), Value::Float64(b)) => {
            f64::from(*a).partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (Value::Float64(a), Value::Float32(b)) => {
            a.partial_cmp(&f64::from(*b)).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
