//! Single-value batched loader.

use std::collections::HashMap;

use parking_lot::Mutex;

use entq_schema::EntityRow;

use crate::error::Result;
use crate::loader::dedup_keys;
use crate::loader::fetch::SingleFetchFn;
use crate::loader::stats::LoaderStats;

/// Batches and caches key-to-row lookups for one operation.
///
/// Every key ever requested through a loader instance is answered from
/// its cache on repeat calls, including keys that had no match. The
/// instance belongs to a single logical operation; construct a fresh one
/// per operation and drop it when the operation ends.
pub struct Loader {
    fetch: SingleFetchFn,
    cache: Mutex<HashMap<String, Option<EntityRow>>>,
    stats: LoaderStats,
}

impl Loader {
    /// Create a loader around a batch-fetch function.
    pub fn new(fetch: SingleFetchFn) -> Self {
        Self {
            fetch,
            cache: Mutex::new(HashMap::new()),
            stats: LoaderStats::default(),
        }
    }

    /// Load a single key. Returns `None` when the key has no match or is
    /// empty after trimming.
    pub fn load(&self, key: &str) -> Result<Option<EntityRow>> {
        let keys = [key.to_string()];
        let mut result = self.load_many(&keys)?;
        Ok(result.remove(key.trim()).flatten())
    }

    /// Load a batch of keys.
    ///
    /// The result covers every unique non-empty trimmed key in `keys`;
    /// keys with no match map to `None`. A fetch error aborts the whole
    /// call and caches nothing, so a retry fetches the same keys again.
    pub fn load_many(&self, keys: &[String]) -> Result<HashMap<String, Option<EntityRow>>> {
        let keys = dedup_keys(keys);
        let mut results = HashMap::with_capacity(keys.len());
        let mut missing = Vec::new();

        {
            let cache = self.cache.lock();
            for key in keys {
                match cache.get(&key) {
                    Some(value) => {
                        results.insert(key, value.clone());
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

        // The fetch runs outside the lock, so two concurrent calls that
        // both miss a key may both fetch it. The merge below is
        // idempotent, which makes the double fetch wasted work rather
        // than a correctness problem.
        self.stats.record_fetch();
        tracing::trace!(keys = missing.len(), "single loader batch fetch");
        let mut fetched = (self.fetch)(&missing)?;

        let mut cache = self.cache.lock();
        for key in missing {
            let value = fetched.remove(&key);
            cache.insert(key.clone(), value.clone());
            results.insert(key, value);
        }
        Ok(results)
    }

    /// Counters for this instance.
    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn row(id: i64, name: &str) -> EntityRow {
        EntityRow::new().with("id", id).with("name", name)
    }

    fn keyed_fetch(calls: Arc<AtomicUsize>) -> SingleFetchFn {
        Arc::new(move |keys| {
            calls.fetch_add(1, Ordering::SeqCst);
            let mut out = HashMap::new();
            for key in keys {
                if key != "missing" {
                    out.insert(key.clone(), row(key.len() as i64, key));
                }
            }
            Ok(out)
        })
    }

    #[test]
    fn test_load_many_covers_every_key() {
        let loader = Loader::new(keyed_fetch(Arc::new(AtomicUsize::new(0))));
        let keys = vec!["a".to_string(), "missing".to_string()];
        let result = loader.load_many(&keys).unwrap();

        assert_eq!(result.len(), 2);
        assert!(result["a"].is_some());
        assert!(result["missing"].is_none());
    }

    #[test]
    fn test_second_call_is_served_from_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = Loader::new(keyed_fetch(calls.clone()));
        let keys = vec!["a".to_string(), "b".to_string()];

        let first = loader.load_many(&keys).unwrap();
        let second = loader.load_many(&keys).unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.stats().fetches(), 1);
        assert_eq!(loader.stats().hits(), 2);
        assert_eq!(loader.stats().misses(), 2);
    }

    #[test]
    fn test_absent_keys_are_cached_too() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = Loader::new(keyed_fetch(calls.clone()));
        let keys = vec!["missing".to_string()];

        assert!(loader.load_many(&keys).unwrap()["missing"].is_none());
        assert!(loader.load_many(&keys).unwrap()["missing"].is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_keys_are_trimmed_and_deduplicated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = Loader::new(keyed_fetch(calls.clone()));
        let keys = vec![
            " a ".to_string(),
            "a".to_string(),
            "".to_string(),
            "  ".to_string(),
        ];

        let result = loader.load_many(&keys).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result["a"].is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_single_key() {
        let loader = Loader::new(keyed_fetch(Arc::new(AtomicUsize::new(0))));
        assert!(loader.load("a").unwrap().is_some());
        assert!(loader.load("missing").unwrap().is_none());
        assert!(loader.load("  ").unwrap().is_none());
    }

    #[test]
    fn test_fetch_error_caches_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_fetch = calls.clone();
        let fetch: SingleFetchFn = Arc::new(move |keys| {
            if calls_in_fetch.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(Error::Fetch("backend down".to_string()));
            }
            let mut out = HashMap::new();
            for key in keys {
                out.insert(key.clone(), row(1, key));
            }
            Ok(out)
        });

        let loader = Loader::new(fetch);
        let keys = vec!["a".to_string()];

        let err = loader.load_many(&keys).unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));

        // The retry fetches the same key again and succeeds.
        let result = loader.load_many(&keys).unwrap();
        assert!(result["a"].is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cached_keys_survive_a_failed_batch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_fetch = calls.clone();
        let fetch: SingleFetchFn = Arc::new(move |keys| {
            if keys.iter().any(|k| k == "bad") {
                return Err(Error::Fetch("backend down".to_string()));
            }
            calls_in_fetch.fetch_add(1, Ordering::SeqCst);
            let mut out = HashMap::new();
            for key in keys {
                out.insert(key.clone(), row(1, key));
            }
            Ok(out)
        });

        let loader = Loader::new(fetch);
        loader.load_many(&["a".to_string()]).unwrap();
        assert!(loader.load_many(&["a".to_string(), "bad".to_string()]).is_err());

        // "a" is still cached; loading it alone issues no new fetch.
        loader.load_many(&["a".to_string()]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_loads_agree() {
        let loader = Arc::new(Loader::new(keyed_fetch(Arc::new(AtomicUsize::new(0)))));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let loader = loader.clone();
            handles.push(std::thread::spawn(move || {
                loader.load_many(&["a".to_string(), "b".to_string()]).unwrap()
            }));
        }

        let mut results = handles.into_iter().map(|h| h.join().unwrap());
        let first = results.next().unwrap();
        for result in results {
            assert_eq!(result, first);
        }
        // Overlapping misses may double fetch; the results still agree.
        assert!(loader.stats().fetches() >= 1);
    }
}
