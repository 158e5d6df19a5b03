//! The node's data store: two independent key-value tables, `own` (primary
//! storage) and `prev` (replica storage for the predecessor's keyspace).

use corelib::TableTag;
use dashmap::DashMap;

/// Outcome of a mutating store operation: whether the key was present.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// The operation was applied.
    Applied,
    /// The key was not present (`update`/`delete` only).
    NotFound,
}

/// Two concurrent-safe tables, indexed by [`TableTag`].
///
/// Each table is its own `DashMap`: reads and writes on distinct keys never
/// block one another, and the two tables never interact with each other.
#[derive(Default)]
pub struct Store {
    own: DashMap<String, String>,
    prev: DashMap<String, String>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, tag: TableTag) -> &DashMap<String, String> {
        match tag {
            TableTag::Own => &self.own,
            TableTag::Prev => &self.prev,
        }
    }

    /// Returns the stored value for `key` in `tag`'s table, if present.
    pub fn get(&self, tag: TableTag, key: &str) -> Option<String> {
        self.table(tag).get(key).map(|v| v.clone())
    }

    /// Unconditionally installs `(key, value)`, overwriting any prior value.
    pub fn put(&self, tag: TableTag, key: &str, value: &str) {
        self.table(tag).insert(key.to_string(), value.to_string());
    }

    /// Replaces the value for `key` only if it is already present.
    pub fn update(&self, tag: TableTag, key: &str, value: &str) -> Outcome {
        match self.table(tag).get_mut(key) {
            Some(mut slot) => {
                *slot = value.to_string();
                Outcome::Applied
            }
            None => Outcome::NotFound,
        }
    }

    /// Removes `key` only if it is present.
    pub fn delete(&self, tag: TableTag, key: &str) -> Outcome {
        match self.table(tag).remove(key) {
            Some(_) => Outcome::Applied,
            None => Outcome::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let store = Store::new();
        store.put(TableTag::Own, "k", "v");
        assert_eq!(store.get(TableTag::Own, "k"), Some("v".to_string()));
    }

    #[test]
    fn own_and_prev_tables_are_independent() {
        let store = Store::new();
        store.put(TableTag::Own, "k", "own-value");
        store.put(TableTag::Prev, "k", "prev-value");
        assert_eq!(store.get(TableTag::Own, "k"), Some("own-value".to_string()));
        assert_eq!(store.get(TableTag::Prev, "k"), Some("prev-value".to_string()));
    }

    #[test]
    fn update_on_absent_key_reports_not_found() {
        let store = Store::new();
        assert_eq!(store.update(TableTag::Own, "missing", "v"), Outcome::NotFound);
        assert_eq!(store.get(TableTag::Own, "missing"), None);
    }

    #[test]
    fn update_on_present_key_replaces_value() {
        let store = Store::new();
        store.put(TableTag::Own, "k", "v1");
        assert_eq!(store.update(TableTag::Own, "k", "v2"), Outcome::Applied);
        assert_eq!(store.get(TableTag::Own, "k"), Some("v2".to_string()));
    }

    #[test]
    fn delete_is_idempotent_after_first_success() {
        let store = Store::new();
        store.put(TableTag::Own, "k", "v");
        assert_eq!(store.delete(TableTag::Own, "k"), Outcome::Applied);
        assert_eq!(store.delete(TableTag::Own, "k"), Outcome::NotFound);
    }
}
