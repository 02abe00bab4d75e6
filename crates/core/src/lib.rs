//! Core types and contracts for Runway
//!
//! This crate defines the foundational pieces shared by every layer:
//! - Error: the crate-wide error taxonomy
//! - RunStatus: closed tagged run lifecycle status with a flat wire form
//! - keys: the authoritative store key namespace
//! - Traits: the consumed contracts (StoreClient, ConfigResolver)
//!
//! Nothing in this crate performs I/O; the store and configuration service
//! are reached only through the trait contracts defined here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod keys;
pub mod status;
pub mod traits;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use status::RunStatus;
pub use traits::{ConfigResolver, StoreClient};
