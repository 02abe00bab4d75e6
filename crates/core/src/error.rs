//! Error types for the run coordination core
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! A failed compare-and-swap is never an error: it is the expected contention
//! signal that drives the allocator's retry loop, and the store contract
//! reports it as `Ok(false)`.

use thiserror::Error;

/// Result type alias for run coordination operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the run coordination core
#[derive(Debug, Error)]
pub enum Error {
    /// A required submission field is missing or blank
    ///
    /// Raised before any store access is attempted.
    #[error("invalid submission: {0}")]
    Validation(String),

    /// A run's persisted properties cannot be parsed into a valid record
    #[error("malformed record for run {run}: {reason}")]
    MalformedRecord {
        /// Name of the run whose properties failed to parse
        run: String,
        /// What was wrong with the persisted properties
        reason: String,
    },

    /// Underlying store read/write failure unrelated to CAS contention
    #[error("store error: {0}")]
    Store(String),

    /// Two full wraparounds of the number space without finding a free slot
    #[error("no run numbers available for prefix {prefix}, looped twice")]
    NumbersExhausted {
        /// The run-name prefix whose number space is exhausted
        prefix: String,
    },

    /// Cancellation observed while waiting to retry a contended allocation
    #[error("interrupted while waiting to retry")]
    Interrupted,

    /// A run submission failed; the original cause is attached
    #[error("problem submitting run")]
    Submission(#[source] Box<Error>),
}

impl Error {
    /// Wrap a failure as a submission error, attaching the original cause
    pub fn submission(cause: Error) -> Self {
        Error::Submission(Box::new(cause))
    }

    /// Build a malformed-record error for the named run
    pub fn malformed(run: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            run: run.into(),
            reason: reason.into(),
        }
    }
}
