//! Per-operation batched entity loading.
//!
//! A loader answers "these keys, which rows" questions in batches. Every
//! requested key is answered exactly once per instance: the first request
//! fetches, later requests hit the per-instance cache. Instances are
//! constructed per logical operation by [`LoaderSet::for_operation`] and
//! discarded with the operation, so nothing here is shared across
//! operations.

pub mod fetch;
pub mod group;
pub mod set;
pub mod single;
pub mod stats;

pub use fetch::{GroupFetchFn, PivotFetchFn, RowSource, SingleFetchFn};
pub use group::GroupLoader;
pub use set::{LoaderSet, RelationLoader};
pub use single::Loader;
pub use stats::LoaderStats;

/// Unique non-empty trimmed keys, first occurrence order preserved.
pub(crate) fn dedup_keys(keys: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(keys.len());
    for key in keys {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        if seen.insert(key.to_string()) {
            out.push(key.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keys_trims_and_preserves_order() {
        let keys = vec![
            " b ".to_string(),
            "a".to_string(),
            "b".to_string(),
            "".to_string(),
            "\t".to_string(),
            "a ".to_string(),
            "c".to_string(),
        ];
        assert_eq!(dedup_keys(&keys), ["b", "a", "c"]);
    }

    #[test]
    fn test_dedup_keys_empty_input() {
        assert!(dedup_keys(&[]).is_empty());
        assert!(dedup_keys(&["   ".to_string()]).is_empty());
    }
}
