//! Interning caches for canonical dimensions and units
//!
//! Values are held weakly: an entry lives only as long as somebody outside
//! the cache still holds the interned value. A lookup that finds a dead
//! entry is an ordinary miss and the caller rebuilds the value.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Entry count that triggers the first sweep of dead entries
const INITIAL_PURGE_AT: usize = 64;

/// Process-wide map from a canonical key to the single shared instance
pub struct InternCache<K, V> {
    name: &'static str,
    inner: Mutex<Entries<K, V>>,
}

struct Entries<K, V> {
    map: HashMap<K, Weak<V>>,
    purge_at: usize,
}

impl<K: Hash + Eq, V> InternCache<K, V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(Entries {
                map: HashMap::new(),
                purge_at: INITIAL_PURGE_AT,
            }),
        }
    }

    /// The live instance for `key`, if any
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let inner = self.inner.lock();
        inner.map.get(key).and_then(Weak::upgrade)
    }

    /// Publish `value` under `key` unless a live instance is already there.
    /// Returns whichever instance won; a losing `value` is simply dropped.
    pub fn insert_if_absent(&self, key: K, value: Arc<V>) -> Arc<V> {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.map.get(&key).and_then(Weak::upgrade) {
            tracing::trace!(cache = self.name, "lost interning race, reusing instance");
            return existing;
        }
        inner.map.insert(key, Arc::downgrade(&value));
        tracing::debug!(cache = self.name, entries = inner.map.len(), "interned new instance");

        if inner.map.len() >= inner.purge_at {
            let before = inner.map.len();
            inner.map.retain(|_, weak| weak.strong_count() > 0);
            let after = inner.map.len();
            inner.purge_at = (after * 2).max(INITIAL_PURGE_AT);
            tracing::debug!(cache = self.name, before, after, "purged dead entries");
        }
        value
    }

    /// Look `key` up, building the value outside the lock on a miss.
    ///
    /// `build` may itself use other caches (or this one, for a different
    /// key). Concurrent callers may each build a value; only one is kept.
    pub fn get_or_insert_with(&self, key: K, build: impl FnOnce() -> V) -> Arc<V> {
        if let Some(existing) = self.get(&key) {
            return existing;
        }
        tracing::trace!(cache = self.name, "cache miss");
        self.insert_if_absent(key, Arc::new(build()))
    }

    /// Number of entries whose value is still alive
    pub fn len(&self) -> usize {
        let inner = self.inner.lock();
        inner.map.values().filter(|weak| weak.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all dead entries; returns how many were removed
    pub fn purge(&self) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.map.len();
        inner.map.retain(|_, weak| weak.strong_count() > 0);
        before - inner.map.len()
    }
}
