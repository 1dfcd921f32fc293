//! Bounded per-directory listing cache.
//!
//! [`DirectoryCache`] maps a trailing-slash-normalized directory path to its
//! last known listing. The cache is bounded: inserting a listing for a *new*
//! path while at capacity evicts exactly one existing path first, chosen by
//! the configured [`EvictionStrategy`]. The shipped strategy is
//! [`RandomEviction`], which picks a victim uniformly at random. It trades
//! hit-rate optimality for O(1) bookkeeping with no access-time tracking,
//! which is acceptable because the remote provider stays the source of truth
//! on a miss.
//!
//! Eviction order: the capacity check runs *before* the insertion and only
//! when the incoming key is not already cached, so a `set` call can never
//! evict the listing it is about to insert, and the cache never exceeds its
//! capacity.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, trace};

use crate::entry::DirectoryEntry;
use crate::path::dir_key;
use crate::stats::CacheStats;

/// Default number of directory listings retained.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

/// Picks which cached path to drop when the cache is full.
///
/// The cache reports accesses and removals so stateful strategies (an LRU,
/// say) can keep their books; [`RandomEviction`] ignores both callbacks.
pub trait EvictionStrategy: Send {
    /// Called whenever a path is read or written.
    fn record_access(&mut self, _path: &str) {}

    /// Called whenever a path leaves the cache.
    fn record_removal(&mut self, _path: &str) {}

    /// Choose the index of the victim among the current keys.
    ///
    /// Returns `None` only when `keys` is empty.
    fn pick_victim(&mut self, keys: &[&str]) -> Option<usize>;
}

/// Uniformly random victim selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEviction;

impl EvictionStrategy for RandomEviction {
    fn pick_victim(&mut self, keys: &[&str]) -> Option<usize> {
        if keys.is_empty() {
            None
        } else {
            Some(rand::rng().random_range(0..keys.len()))
        }
    }
}

/// Bounded mapping from directory path to its cached listing.
///
/// Not internally synchronized; the state store wraps it in a mutex to
/// preserve the single-writer invariant.
pub struct DirectoryCache {
    listings: HashMap<String, Vec<DirectoryEntry>>,
    capacity: usize,
    strategy: Box<dyn EvictionStrategy>,
    stats: Option<Arc<CacheStats>>,
}

impl fmt::Debug for DirectoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryCache")
            .field("len", &self.listings.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl Default for DirectoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryCache {
    /// Cache with the default capacity and random eviction.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Cache with a custom capacity and random eviction.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_strategy(capacity, Box::new(RandomEviction))
    }

    /// Cache with a custom capacity and eviction strategy.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_strategy(capacity: usize, strategy: Box<dyn EvictionStrategy>) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        Self {
            listings: HashMap::with_capacity(capacity),
            capacity,
            strategy,
            stats: None,
        }
    }

    /// Attach shared statistics counters.
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<CacheStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Cached listing for `path`, or empty if absent. Never fails.
    pub fn get(&mut self, path: &str) -> Vec<DirectoryEntry> {
        let key = dir_key(path);
        self.strategy.record_access(&key);
        match self.listings.get(&key) {
            Some(files) => {
                if let Some(stats) = &self.stats {
                    stats.record_hit();
                }
                files.clone()
            }
            None => {
                if let Some(stats) = &self.stats {
                    stats.record_miss();
                }
                trace!(path = %key, "cache miss");
                Vec::new()
            }
        }
    }

    /// Overwrite the listing for `path`, evicting one existing path first if
    /// the insertion would push the cache over capacity.
    pub fn set(&mut self, path: &str, entries: Vec<DirectoryEntry>) {
        let key = dir_key(path);
        if !self.listings.contains_key(&key) && self.listings.len() >= self.capacity {
            self.evict_one();
        }
        debug!(path = %key, entries = entries.len(), "cache set");
        self.strategy.record_access(&key);
        self.listings.insert(key, entries);
    }

    /// Apply a targeted mutation to the listing for `path`, creating an empty
    /// listing (with the same eviction rules as [`set`](Self::set)) when the
    /// path is not cached yet.
    pub fn update(&mut self, path: &str, f: impl FnOnce(&mut Vec<DirectoryEntry>)) {
        let key = dir_key(path);
        if !self.listings.contains_key(&key) {
            if self.listings.len() >= self.capacity {
                self.evict_one();
            }
            self.listings.insert(key.clone(), Vec::new());
        }
        self.strategy.record_access(&key);
        f(self
            .listings
            .get_mut(&key)
            .expect("listing inserted above"));
    }

    /// Apply a mutation to every cached entry, across all listings.
    ///
    /// Used by the recursive permission update.
    pub fn for_each_entry_mut(&mut self, mut f: impl FnMut(&mut DirectoryEntry)) {
        for files in self.listings.values_mut() {
            for entry in files.iter_mut() {
                f(entry);
            }
        }
    }

    /// Whether some entry of `get(directory_path)` has the given full path.
    pub fn exists(&mut self, full_path: &str, directory_path: &str) -> bool {
        self.get(directory_path)
            .iter()
            .any(|entry| entry.full_path == full_path)
    }

    /// Whether a listing for `path` is cached.
    pub fn contains(&self, path: &str) -> bool {
        self.listings.contains_key(&dir_key(path))
    }

    /// Number of cached directory paths.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Configured capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_one(&mut self) {
        let keys: Vec<&str> = self.listings.keys().map(String::as_str).collect();
        let Some(index) = self.strategy.pick_victim(&keys) else {
            return;
        };
        let victim = keys[index].to_string();
        debug!(path = %victim, "evicting cached listing");
        self.listings.remove(&victim);
        self.strategy.record_removal(&victim);
        if let Some(stats) = &self.stats {
            stats.record_eviction();
        }
    }
}
