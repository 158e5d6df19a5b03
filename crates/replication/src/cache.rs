//! The coordinator's most-recently-used result cache.
//!
//! A bounded `key -> value` mapping of capacity [`CAPACITY`], guarded by one
//! `parking_lot::Mutex` so every public operation is atomic. Recency is
//! tracked with a `VecDeque` alongside the `HashMap` (an `IndexMap`-style
//! pairing) rather than an intrusive linked list.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

/// Maximum number of entries the cache holds at once.
pub const CAPACITY: usize = 4;

#[derive(Default)]
struct Inner {
    values: HashMap<String, String>,
    /// Recency queue, least-recent at the front, most-recent at the back.
    /// A key appears at most once; `get`/`put` move it to the back.
    order: VecDeque<String>,
}

impl Inner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.to_string());
    }
}

/// Bounded LRU cache of capacity [`CAPACITY`].
#[derive(Default)]
pub struct LruCache {
    inner: Mutex<Inner>,
}

impl LruCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `key`. A hit moves the entry to most-recent (an observed hit
    /// counts as a use).
    pub fn get(&self, key: &str) -> Option<String> {
        let mut inner = self.inner.lock();
        let value = inner.values.get(key).cloned();
        if value.is_some() {
            inner.touch(key);
        }
        value
    }

    /// Whether `key` is present. Does not affect recency — callers that
    /// want a use-on-check should call [`LruCache::get`] instead.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().values.contains_key(key)
    }

    /// Inserts or updates `key`, marking it most-recent. Evicts the
    /// least-recently-used entry if this insertion would exceed
    /// [`CAPACITY`].
    pub fn put(&self, key: &str, value: &str) {
        let mut inner = self.inner.lock();
        let is_new = !inner.values.contains_key(key);
        inner.values.insert(key.to_string(), value.to_string());
        inner.touch(key);

        if is_new && inner.values.len() > CAPACITY {
            if let Some(victim) = inner.order.pop_front() {
                inner.values.remove(&victim);
            }
        }
    }

    /// Removes `key`, if present.
    pub fn remove(&self, key: &str) {
        let mut inner = self.inner.lock();
        if inner.values.remove(key).is_some() {
            if let Some(pos) = inner.order.iter().position(|k| k == key) {
                inner.order.remove(pos);
            }
        }
    }

    /// Number of entries currently cached. Used by tests and diagnostics.
    pub fn len(&self) -> usize {
        self.inner.lock().values.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().values.is_empty()
    }
}
