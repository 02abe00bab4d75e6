//! Consumed contracts: store client and configuration resolver
//!
//! This module defines the two external collaborators the coordination core
//! talks to. Implementations live elsewhere (a distributed store in
//! production, `runway-store` in-memory backends for embedding and tests);
//! swapping them must never affect the allocation protocol.
//!
//! Thread safety: all methods must be safe to call concurrently from multiple
//! threads (requires Send + Sync). The store is also shared by an unbounded
//! number of separate processes; only the two swap operations are
//! synchronized, ordinary reads and writes may interleave freely.

use std::collections::BTreeMap;

use crate::error::Result;

/// Shared key-value store abstraction
///
/// The store must provide linearizable single-key and guarded multi-key
/// compare-and-swap; those two operations are the only synchronization
/// primitives available to the allocator.
///
/// A failed swap is the expected contention outcome and is reported as
/// `Ok(false)`, never as an error.
pub trait StoreClient: Send + Sync {
    /// Get the current value for a key
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Get every key/value pair whose key starts with `prefix`
    ///
    /// Results carry full keys, sorted by key order. The scan is not a
    /// linearizable snapshot across keys; per-key values are current.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn get_prefix(&self, prefix: &str) -> Result<BTreeMap<String, String>>;

    /// Put a key-value pair, creating or overwriting
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key (no-op if absent)
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn delete(&self, key: &str) -> Result<()>;

    /// Delete every key starting with `prefix`
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn delete_prefix(&self, prefix: &str) -> Result<()>;

    /// Single-key compare-and-swap
    ///
    /// Writes `new_value` only if the key's current value equals `expected`
    /// (`None` meaning the key must be absent). Returns whether the swap won.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails; a lost race is
    /// `Ok(false)`.
    fn put_swap(&self, key: &str, expected: Option<&str>, new_value: &str) -> Result<bool>;

    /// Atomic multi-key write guarded by one key's prior value
    ///
    /// Behaves like [`put_swap`](StoreClient::put_swap) on `guard_key`, and on
    /// success additionally writes every pair in `others` within the same
    /// atomic operation. On a lost race nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails; a lost race is
    /// `Ok(false)`.
    fn put_swap_all(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        new_value: &str,
        others: &BTreeMap<String, String>,
    ) -> Result<bool>;
}

/// Configuration property lookup abstraction
///
/// Resolves the allocator's tunables: run-type prefix, prefix maximum number,
/// and the default requestor. The full property key is assembled as
/// `<prefix>.<infix>...<infix>.<suffix>`.
pub trait ConfigResolver: Send + Sync {
    /// Look up a configuration property
    ///
    /// Returns `None` when the property is not configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    fn get_property(&self, prefix: &str, suffix: &str, infixes: &[&str]) -> Result<Option<String>>;
}
