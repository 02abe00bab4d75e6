//! Run lifecycle status
//!
//! ## Design
//!
//! The store persists status as a flat string, and later lifecycle states are
//! written by the external executor rather than this core. Status is therefore
//! a closed tagged variant for the states this core reasons about, with
//! `Other` preserving executor-defined states losslessly through the string
//! wire form.
//!
//! The allocator only ever writes `Queued` at creation time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Run lifecycle status
///
/// Progression is queued → allocated → running → finished; everything past
/// `Queued` is written by the external executor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Run is waiting to be picked up by an executor
    Queued,
    /// Run has been claimed by an executor but is not yet running
    Allocated,
    /// Run is currently executing
    Running,
    /// Run finished (in any outcome)
    Finished,
    /// Executor-defined state this core does not interpret
    Other(String),
}

impl RunStatus {
    /// Check if the run is still waiting in the queue
    pub fn is_queued(&self) -> bool {
        matches!(self, RunStatus::Queued)
    }

    /// Check if the run has been claimed by an executor
    pub fn is_allocated(&self) -> bool {
        matches!(self, RunStatus::Allocated)
    }

    /// Get the flat string wire representation
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::Allocated => "allocated",
            RunStatus::Running => "running",
            RunStatus::Finished => "finished",
            RunStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RunStatus {
    type Err = std::convert::Infallible;

    /// Total conversion: unrecognized states become `Other`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "queued" => RunStatus::Queued,
            "allocated" => RunStatus::Allocated,
            "running" => RunStatus::Running,
            "finished" => RunStatus::Finished,
            other => RunStatus::Other(other.to_string()),
        })
    }
}

impl From<&str> for RunStatus {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or(RunStatus::Other(s.to_string()))
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(RunStatus::from(s.as_str()))
    }
}
