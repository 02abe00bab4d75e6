//! In-memory backends for Runway's consumed contracts
//!
//! This crate implements the store and configuration contracts with:
//! - InMemoryStore: BTreeMap-based store with RwLock and linearizable CAS
//! - InMemoryConfig: flat configuration property map
//!
//! These back single-process embedding and the test suites. Production
//! deployments implement the contracts over their shared distributed store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod memory;

pub use config::InMemoryConfig;
pub use memory::InMemoryStore;
