//! Bounded LRU memo of analysis results.
//!
//! Entries live until capacity pressure evicts them or the process exits;
//! there is no time-based expiry, so a summary can outlive changes to the
//! upstream feed it was built from.

use lru::LruCache;
use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::types::analysis::{AnalysisResult, Fingerprint};

/// Process-wide analysis cache, shared by reference between pipelines.
pub struct AnalysisCache {
    entries: Mutex<LruCache<Fingerprint, AnalysisResult>>,
    in_flight: Mutex<HashMap<Fingerprint, Arc<OnceCell<AnalysisResult>>>>,
}

/// Whether [`AnalysisCache::get_or_compute`] ran the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Computed,
    /// Another caller was already computing this fingerprint.
    Joined,
}

impl AnalysisCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a result, marking it most recently used.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<AnalysisResult> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(fingerprint)
            .cloned()
    }

    /// Store a result, evicting the least recently used entry when full.
    pub fn put(&self, fingerprint: Fingerprint, result: AnalysisResult) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((evicted, _)) = entries.push(fingerprint.clone(), result) {
            if evicted != fingerprint {
                debug!(sku = %evicted.sku, "Evicted cached analysis");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cap()
            .get()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Return the cached result or run `compute` to produce it.
    ///
    /// At most one computation per fingerprint is in flight; concurrent
    /// callers with the same fingerprint wait for it and share its result.
    pub async fn get_or_compute<F, Fut>(
        &self,
        fingerprint: Fingerprint,
        compute: F,
    ) -> (AnalysisResult, Lookup)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AnalysisResult>,
    {
        let cell = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            // Checked under the in-flight lock: a finishing computation stores
            // its result before it unregisters.
            if let Some(hit) = self.get(&fingerprint) {
                return (hit, Lookup::Hit);
            }
            match in_flight.get(&fingerprint) {
                Some(cell) => cell.clone(),
                None => {
                    let cell = Arc::new(OnceCell::new());
                    in_flight.insert(fingerprint.clone(), cell.clone());
                    cell
                }
            }
        };

        let mut ran = false;
        let result = cell
            .get_or_init(|| {
                ran = true;
                compute()
            })
            .await
            .clone();

        if !ran {
            return (result, Lookup::Joined);
        }

        self.put(fingerprint.clone(), result.clone());
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.get(&fingerprint).is_some_and(|c| Arc::ptr_eq(c, &cell)) {
            in_flight.remove(&fingerprint);
        }
        (result, Lookup::Computed)
    }
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::product::Sku;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn fp(sku: &str, text: &str) -> Fingerprint {
        Fingerprint::new(&Sku::new(sku), text)
    }

    fn result(text: &str) -> AnalysisResult {
        AnalysisResult::generated(text, "test")
    }

    #[test]
    fn put_then_get() {
        let cache = AnalysisCache::new(2);
        cache.put(fp("1", "a"), result("one"));

        assert_eq!(cache.get(&fp("1", "a")).unwrap().text, "one");
        assert!(cache.get(&fp("1", "b")).is_none());
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = AnalysisCache::new(2);
        cache.put(fp("1", "a"), result("one"));
        cache.put(fp("2", "b"), result("two"));

        // Touch the first entry so the second becomes the eviction victim.
        assert!(cache.get(&fp("1", "a")).is_some());
        cache.put(fp("3", "c"), result("three"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&fp("1", "a")).is_some());
        assert!(cache.get(&fp("2", "b")).is_none());
        assert!(cache.get(&fp("3", "c")).is_some());
    }

    #[test]
    fn default_capacity_is_one_hundred() {
        let cache = AnalysisCache::default();
        for i in 0..150 {
            cache.put(fp(&i.to_string(), "t"), result("r"));
        }
        assert_eq!(cache.capacity(), 100);
        assert_eq!(cache.len(), 100);
        assert!(cache.get(&fp("0", "t")).is_none());
        assert!(cache.get(&fp("149", "t")).is_some());
    }

    #[tokio::test]
    async fn second_lookup_is_a_hit() {
        let cache = AnalysisCache::new(10);
        let calls = AtomicUsize::new(0);

        let (first, lookup) = cache
            .get_or_compute(fp("1", "a"), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                result("fresh")
            })
            .await;
        assert_eq!(lookup, Lookup::Computed);

        let (second, lookup) = cache
            .get_or_compute(fp("1", "a"), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                result("other")
            })
            .await;

        assert_eq!(lookup, Lookup::Hit);
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_lookups_share_one_computation() {
        let cache = Arc::new(AnalysisCache::new(10));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute(fp("1", "same"), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        result("shared")
                    })
                    .await
                    .0
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().text, "shared");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }
}
