//! Mock storage table for testing batched fetches
//!
//! Provides a [`MockTable`] that simulates a keyed storage table in-memory,
//! recording every fetch it serves so tests can assert on batching and
//! projection behavior without a real database.
//!
//! # Lock Poisoning Recovery
//!
//! This implementation uses `unwrap_or_else(|e| e.into_inner())` when acquiring
//! locks to recover from poisoned locks. If a test panics while holding a lock,
//! subsequent tests can still access the table rather than failing with a
//! `PoisonError`. This prevents cascading test failures.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

/// One recorded fetch: the keys that were requested and the fields that the
/// caller asked the storage layer to project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall<K> {
    /// Keys requested in this fetch, in the order they were passed
    pub keys: Vec<K>,
    /// Projected field names, sorted for stable assertions
    pub fields: Vec<String>,
}

impl<K: Clone + PartialEq> FetchCall<K> {
    /// Whether this fetch asked for the given key
    pub fn contains_key(&self, key: &K) -> bool {
        self.keys.contains(key)
    }
}

/// Mock keyed storage table for testing batched entity fetches
///
/// # Thread Safety
///
/// `MockTable` uses `Arc<RwLock<...>>` internally, so it can be safely cloned
/// and shared across tasks. All clones share the same rows and call log.
///
/// # Example
///
/// ```rust
/// use quill_test_utils::MockTable;
///
/// let table: MockTable<i64, String> = MockTable::new();
/// table.insert(5, "five".to_string());
///
/// let rows = table.fetch(&[5], ["name", "email"]).unwrap();
/// assert_eq!(rows[&5], "five");
///
/// let calls = table.calls();
/// assert_eq!(calls.len(), 1);
/// assert_eq!(calls[0].fields, vec!["email".to_string(), "name".to_string()]);
/// ```
pub struct MockTable<K, V> {
    rows: Arc<RwLock<HashMap<K, V>>>,
    calls: Arc<RwLock<Vec<FetchCall<K>>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl<K, V> MockTable<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new, empty mock table
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Insert or replace a row
    pub fn insert(&self, key: K, row: V) {
        let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
        rows.insert(key, row);
    }

    /// Remove a row, returning whether it existed
    pub fn remove(&self, key: &K) -> bool {
        let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
        rows.remove(key).is_some()
    }

    /// Make every subsequent fetch fail with the given message until
    /// [`MockTable::clear_failure`] is called
    pub fn fail_with(&self, message: impl Into<String>) {
        let mut failure = self.failure.write().unwrap_or_else(|e| e.into_inner());
        *failure = Some(message.into());
    }

    /// Clear an injected failure so fetches succeed again
    pub fn clear_failure(&self) {
        let mut failure = self.failure.write().unwrap_or_else(|e| e.into_inner());
        *failure = None;
    }

    /// Serve a batched fetch: record the call, then return the rows whose
    /// keys exist. Keys with no row are simply absent from the result map.
    ///
    /// Returns the injected failure message instead if one is set. Failed
    /// fetches are still recorded in the call log.
    pub fn fetch(
        &self,
        keys: &[K],
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<HashMap<K, V>, String> {
        let mut fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        fields.sort();

        {
            let mut calls = self.calls.write().unwrap_or_else(|e| e.into_inner());
            calls.push(FetchCall {
                keys: keys.to_vec(),
                fields,
            });
        }

        if let Some(message) = self
            .failure
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(message);
        }

        let rows = self.rows.read().unwrap_or_else(|e| e.into_inner());
        Ok(keys
            .iter()
            .filter_map(|k| rows.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    /// All recorded fetches, oldest first
    pub fn calls(&self) -> Vec<FetchCall<K>> {
        self.calls
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of fetches served (including failed ones)
    pub fn fetch_count(&self) -> usize {
        self.calls.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of fetches that asked for the given key
    pub fn fetches_for(&self, key: &K) -> usize {
        self.calls
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|call| call.contains_key(key))
            .count()
    }

    /// Clear the call log (rows are kept)
    pub fn clear_calls(&self) {
        let mut calls = self.calls.write().unwrap_or_else(|e| e.into_inner());
        calls.clear();
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for MockTable<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for MockTable<K, V> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            calls: self.calls.clone(),
            failure: self.failure.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_table_new() {
        let table: MockTable<i64, String> = MockTable::new();
        assert!(table.is_empty());
        assert_eq!(table.fetch_count(), 0);
    }

    #[test]
    fn test_mock_table_insert_and_fetch() {
        let table = MockTable::new();
        table.insert(1, "one".to_string());
        table.insert(2, "two".to_string());

        let rows = table.fetch(&[1, 2, 3], ["name"]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[&1], "one");
        assert_eq!(rows[&2], "two");
        assert!(!rows.contains_key(&3));
    }

    #[test]
    fn test_mock_table_records_calls() {
        let table = MockTable::new();
        table.insert(5, "five".to_string());

        table.fetch(&[5, 7], ["name", "email"]).unwrap();
        table.fetch(&[7], ["id"]).unwrap();

        let calls = table.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].keys, vec![5, 7]);
        assert_eq!(calls[0].fields, vec!["email".to_string(), "name".to_string()]);
        assert_eq!(calls[1].keys, vec![7]);
    }

    #[test]
    fn test_mock_table_fetches_for() {
        let table: MockTable<i64, String> = MockTable::new();
        table.fetch(&[1, 2], ["a"]).unwrap();
        table.fetch(&[2, 3], ["a"]).unwrap();

        assert_eq!(table.fetches_for(&1), 1);
        assert_eq!(table.fetches_for(&2), 2);
        assert_eq!(table.fetches_for(&4), 0);
    }

    #[test]
    fn test_mock_table_failure_injection() {
        let table = MockTable::new();
        table.insert(1, "one".to_string());
        table.fail_with("connection reset");

        let err = table.fetch(&[1], ["name"]).unwrap_err();
        assert_eq!(err, "connection reset");
        // Failed fetches still count against the log
        assert_eq!(table.fetch_count(), 1);

        table.clear_failure();
        assert!(table.fetch(&[1], ["name"]).is_ok());
    }

    #[test]
    fn test_mock_table_remove() {
        let table = MockTable::new();
        table.insert(1, "one".to_string());
        assert!(table.remove(&1));
        assert!(!table.remove(&1));
        assert!(table.fetch(&[1], ["name"]).unwrap().is_empty());
    }

    #[test]
    fn test_mock_table_clone_shares_state() {
        let table = MockTable::new();
        table.insert(1, "one".to_string());

        let table2 = table.clone();
        table2.fetch(&[1], ["name"]).unwrap();

        // Calls recorded through one clone are visible through the other
        assert_eq!(table.fetch_count(), 1);

        table2.insert(2, "two".to_string());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_mock_table_clear_calls() {
        let table: MockTable<i64, String> = MockTable::new();
        table.fetch(&[1], ["a"]).unwrap();
        table.clear_calls();
        assert_eq!(table.fetch_count(), 0);
    }

    #[test]
    fn test_mock_table_fields_sorted_for_assertions() {
        let table: MockTable<i64, String> = MockTable::new();
        table.fetch(&[1], ["zebra", "alpha", "mid"]).unwrap();

        let calls = table.calls();
        assert_eq!(
            calls[0].fields,
            vec!["alpha".to_string(), "mid".to_string(), "zebra".to_string()]
        );
    }

    #[test]
    fn test_mock_table_default() {
        let table: MockTable<i64, String> = MockTable::default();
        assert!(table.is_empty());
    }
}
