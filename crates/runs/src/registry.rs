//! RunRegistry: read-side queries and lifecycle mutations
//!
//! ## Design
//!
//! The registry is a stateless facade over the store client. Every listing is
//! one `run.` prefix scan, deduplicated by the run name extracted from each
//! key; per-run property subsets are carved out of the same scan, so a
//! listing costs a single store round trip.
//!
//! Scans race with allocators by design. The atomic install makes a complete
//! run appear in one step, but a store being deleted under us (or written by
//! a non-conforming client) can expose a partial property set. Listings skip
//! such runs and log a warning rather than failing wholesale; fetching one
//! run by name fails fast instead, because the caller named exactly the
//! record that is broken.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use runway_core::keys::{run_key, run_name_of, run_prefix, RUN_PREFIX};
use runway_core::{Error, Result, RunStatus, StoreClient};

use crate::record::Run;

/// Read-side queries over the store's `run.` namespace
///
/// Stateless facade; instances may be cloned and shared across threads.
#[derive(Clone)]
pub struct RunRegistry {
    store: Arc<dyn StoreClient>,
}

impl RunRegistry {
    /// Create a registry over the given store
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self { store }
    }

    /// One record per distinct run name found under the `run.` prefix
    ///
    /// Runs whose persisted properties are malformed (typically mid-mutation)
    /// are skipped with a warning so one in-flight run cannot break listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store scan fails.
    pub fn all_runs(&self) -> Result<Vec<Run>> {
        trace!(target: "runway::registry", "fetching all runs from store");
        let properties = self.store.get_prefix(RUN_PREFIX)?;
        trace!(target: "runway::registry", keys = properties.len(), "fetched all runs from store");

        let mut names = BTreeSet::new();
        for key in properties.keys() {
            if let Some(name) = run_name_of(key) {
                names.insert(name.to_string());
            }
        }

        let mut runs = Vec::with_capacity(names.len());
        for name in names {
            match Run::from_properties(&name, &subset(&properties, &name)) {
                Ok(run) => runs.push(run),
                Err(Error::MalformedRecord { run, reason }) => {
                    warn!(
                        target: "runway::registry",
                        run = %run,
                        reason = %reason,
                        "skipping malformed run during listing"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(runs)
    }

    /// Runs with a heartbeat or an `allocated` status
    ///
    /// # Errors
    ///
    /// Returns an error if the store scan fails.
    pub fn active_runs(&self) -> Result<Vec<Run>> {
        let mut runs = self.all_runs()?;
        runs.retain(|run| run.heartbeat().is_some() || run.status() == Some(&RunStatus::Allocated));
        Ok(runs)
    }

    /// Runs whose status is `queued`
    ///
    /// # Errors
    ///
    /// Returns an error if the store scan fails.
    pub fn queued_runs(&self) -> Result<Vec<Run>> {
        let mut runs = self.all_runs()?;
        runs.retain(|run| run.status() == Some(&RunStatus::Queued));
        Ok(runs)
    }

    /// Runs sharing the given group correlation identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the store scan fails.
    pub fn grouped_runs(&self, group: &str) -> Result<Vec<Run>> {
        let mut runs = self.all_runs()?;
        runs.retain(|run| run.group() == group);
        Ok(runs)
    }

    /// Names of the currently active runs
    ///
    /// # Errors
    ///
    /// Returns an error if the store scan fails.
    pub fn active_run_names(&self) -> Result<HashSet<String>> {
        Ok(self
            .active_runs()?
            .into_iter()
            .map(|run| run.name().to_string())
            .collect())
    }

    /// Fetch one run by exact name
    ///
    /// Returns `None` when the run's namespace is empty (not an error).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if the named run exists but its
    /// properties do not parse, or an error if the store read fails.
    pub fn get_run(&self, name: &str) -> Result<Option<Run>> {
        let properties = self.store.get_prefix(&run_prefix(name))?;
        if properties.is_empty() {
            return Ok(None);
        }
        Run::from_properties(name, &properties).map(Some)
    }

    /// Remove every property of the named run
    ///
    /// Returns `false` when the run does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a store operation fails.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let prefix = run_prefix(name);
        if self.store.get_prefix(&prefix)?.is_empty() {
            return Ok(false);
        }

        self.store.delete_prefix(&prefix)?;
        debug!(target: "runway::registry", run = %name, "deleted run");
        Ok(true)
    }

    /// Return a non-local run to the queue
    ///
    /// Clears the heartbeat and sets the status back to `queued`, leaving all
    /// other metadata in place. Returns `false` when the run does not exist
    /// or is local (local runs are exempt from reset).
    ///
    /// # Errors
    ///
    /// Returns an error if a store operation fails.
    pub fn reset(&self, name: &str) -> Result<bool> {
        let prefix = run_prefix(name);
        let properties = self.store.get_prefix(&prefix)?;
        if properties.is_empty() {
            return Ok(false);
        }

        if properties.get(&run_key(name, "local")).map(String::as_str) == Some("true") {
            debug!(target: "runway::registry", run = %name, "refusing to reset local run");
            return Ok(false);
        }

        self.store.delete(&run_key(name, "heartbeat"))?;
        self.store.put(&run_key(name, "status"), RunStatus::Queued.as_str())?;
        debug!(target: "runway::registry", run = %name, "reset run to queued");
        Ok(true)
    }
}

/// Carve one run's properties out of a whole-namespace scan
fn subset(properties: &BTreeMap<String, String>, name: &str) -> BTreeMap<String, String> {
    let prefix = run_prefix(name);
    properties
        .iter()
        .filter(|(k, _)| k.starts_with(&prefix))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
