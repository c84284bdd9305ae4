//! Shared cache of ranked search results.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::path::RankedRoutes;

/// Thread-safe map from an ordered `(source, destination)` key to the
/// ranked routes found for it.
///
/// Entries are never invalidated: a graph's search result for a fixed key
/// is deterministic, so the first committed result stays for the lifetime
/// of the cache.
pub struct PathCache<V> {
    cache: DashMap<(V, V), Arc<RankedRoutes>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Eq + Hash + Clone> PathCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get the cached result for a key.
    pub fn get(&self, source: &V, destination: &V) -> Option<Arc<RankedRoutes>> {
        let key = (source.clone(), destination.clone());

        match self.cache.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(entry.value()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Commit a result unless another caller already did.
    ///
    /// Returns the committed entry, which is the earlier one when two
    /// searches for the same key race.
    pub fn insert(&self, source: V, destination: V, routes: RankedRoutes) -> Arc<RankedRoutes> {
        let entry = self
            .cache
            .entry((source, destination))
            .or_insert_with(|| Arc::new(routes));
        Arc::clone(entry.value())
    }

    /// Drop every entry and reset statistics.
    pub fn clear(&self) {
        self.cache.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Get the number of entries in cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> PathCacheStats {
        PathCacheStats {
            entries: self.cache.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<V: Eq + Hash + Clone> Default for PathCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathCacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl PathCacheStats {
    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeId;
    use crate::path::Route;

    fn routes(first: usize) -> RankedRoutes {
        RankedRoutes::new([
            Route::new(vec![EdgeId(first)], 1),
            Route::empty(),
            Route::empty(),
        ])
    }

    #[test]
    fn test_cache_insert_and_get() {
        let cache = PathCache::new();
        cache.insert("USD", "EUR", routes(4));

        let cached = cache.get(&"USD", &"EUR").unwrap();
        assert_eq!(cached.best().edges(), &[EdgeId(4)]);
    }

    #[test]
    fn test_cache_key_is_ordered() {
        let cache = PathCache::new();
        cache.insert("USD", "EUR", routes(0));

        assert!(cache.get(&"EUR", &"USD").is_none());
    }

    #[test]
    fn test_first_writer_wins() {
        let cache = PathCache::new();
        let first = cache.insert("USD", "EUR", routes(1));
        let second = cache.insert("USD", "EUR", routes(2));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.best().edges(), &[EdgeId(1)]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_stats() {
        let cache = PathCache::new();
        assert!(cache.get(&"USD", &"EUR").is_none());
        cache.insert("USD", "EUR", routes(0));
        assert!(cache.get(&"USD", &"EUR").is_some());

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.5);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), PathCacheStats::default());
    }
}
