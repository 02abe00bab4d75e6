//! Runway - collision-free run allocation over a shared key-value store
//!
//! Runway is the coordination core of a distributed test/job execution
//! framework. Many uncoordinated submitter processes race to allocate runs
//! against one shared store; the allocator serializes them with nothing but
//! the store's compare-and-swap primitives.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use runway::{InMemoryConfig, InMemoryStore, RunAllocator, RunRegistry, RunSubmission};
//!
//! # fn main() -> runway::Result<()> {
//! let store = Arc::new(InMemoryStore::new());
//! let config = Arc::new(InMemoryConfig::new());
//!
//! let allocator = RunAllocator::new(store.clone(), config);
//! let run = allocator.submit(
//!     RunSubmission::new("acme.tests", "HelloTest").run_type("local"),
//! )?;
//! assert!(run.name().starts_with('L'));
//!
//! let registry = RunRegistry::new(store);
//! assert_eq!(registry.queued_runs()?.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The library splits into three member crates, re-exported here:
//!
//! - `runway-core`: error taxonomy, run status, store key layout, and the
//!   [`StoreClient`]/[`ConfigResolver`] contracts the coordination core
//!   consumes.
//! - `runway-runs`: the [`Run`] record decoder, the read-side
//!   [`RunRegistry`], and the write-side [`RunAllocator`].
//! - `runway-store`: in-memory reference backends for embedding and tests.
//!
//! Production deployments implement [`StoreClient`] and [`ConfigResolver`]
//! over their shared store and configuration service; the allocator only
//! requires linearizable single-key and guarded multi-key compare-and-swap.

// Re-export the public API from the member crates
pub use runway_core::{keys, ConfigResolver, Error, Result, RunStatus, StoreClient};
pub use runway_runs::{Backoff, Run, RunAllocator, RunRegistry, RunSubmission};
pub use runway_store::{InMemoryConfig, InMemoryStore};
