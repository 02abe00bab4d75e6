//! InMemoryStore: reference store backend with BTreeMap and RwLock
//!
//! This module implements the StoreClient contract using:
//! - `BTreeMap<String, String>` for ordered key storage and cheap prefix scans
//! - `parking_lot::RwLock` for thread-safe access
//!
//! # Design Notes
//!
//! - Both swap forms take the write lock exactly once, so single-key and
//!   guarded multi-key swaps are linearizable — the property the allocation
//!   protocol assumes of the real store.
//! - Prefix scans hold the read lock for the duration of the range walk; a
//!   scan therefore sees a point-in-time view here, which is stronger than
//!   the contract requires.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;

use runway_core::{Result, StoreClient};

/// In-memory store backend
///
/// Implements the StoreClient contract for embedding and tests.
/// Thread-safe through `parking_lot::RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held (test convenience)
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn matching_keys(data: &BTreeMap<String, String>, prefix: &str) -> Vec<String> {
        data.range::<String, _>((Bound::Included(prefix.to_string()), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl StoreClient for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn get_prefix(&self, prefix: &str) -> Result<BTreeMap<String, String>> {
        let data = self.data.read();
        Ok(data
            .range::<String, _>((Bound::Included(prefix.to_string()), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn delete_prefix(&self, prefix: &str) -> Result<()> {
        let mut data = self.data.write();
        for key in Self::matching_keys(&data, prefix) {
            data.remove(&key);
        }
        Ok(())
    }

    fn put_swap(&self, key: &str, expected: Option<&str>, new_value: &str) -> Result<bool> {
        let mut data = self.data.write();
        if data.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        data.insert(key.to_string(), new_value.to_string());
        Ok(true)
    }

    fn put_swap_all(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        new_value: &str,
        others: &BTreeMap<String, String>,
    ) -> Result<bool> {
        let mut data = self.data.write();
        if data.get(guard_key).map(String::as_str) != expected {
            return Ok(false);
        }
        data.insert(guard_key.to_string(), new_value.to_string());
        for (key, value) in others {
            data.insert(key.clone(), value.clone());
        }
        Ok(true)
    }
}
