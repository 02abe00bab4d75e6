//! Run coordination core: record, registry, and allocator
//!
//! ## Design
//!
//! Three pieces share the `run.<name>.*` store namespace:
//!
//! - [`Run`]: decode of one run's flat property set into a typed record.
//! - [`RunRegistry`]: read-side queries plus delete/reset, a stateless facade
//!   over the store client.
//! - [`RunAllocator`]: write-side, mints globally unique run names with a
//!   double compare-and-swap protocol and installs the initial property set
//!   atomically.
//!
//! The registry and allocator share only the record type; neither holds state
//! beyond its `Arc`'d collaborators, so instances may be cloned and shared
//! across threads freely.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod allocator;
pub mod backoff;
pub mod record;
pub mod registry;

pub use allocator::{RunAllocator, RunSubmission};
pub use backoff::Backoff;
pub use record::Run;
pub use registry::RunRegistry;
