//! RunAllocator: contention-safe run name allocation
//!
//! ## Design
//!
//! Many uncoordinated submitter processes share one store and no lock
//! manager. Allocation is therefore fully optimistic, built on exactly two
//! synchronization primitives:
//!
//! 1. A single-key compare-and-swap claims the next number on the prefix
//!    counter (`request.prefix.<prefix>.lastused`).
//! 2. A guarded multi-key compare-and-swap installs the run's entire initial
//!    property set atomically, with `run.<name>.test` as the must-be-absent
//!    guard. This catches name reuse after a counter wrap or a cross-prefix
//!    collision.
//!
//! Losing either swap is the expected contention signal: wait a short random
//! interval and start over from the counter read. No mutex is taken anywhere;
//! the real contention is cross-process and only the store can serialize it.
//!
//! Counter gaps are permitted: a submitter that claims a number and then
//! fails (or is cancelled) wastes that number, which is bounded and harmless.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use runway_core::keys::{last_used_key, run_key, run_prefix};
use runway_core::{ConfigResolver, Error, Result, RunStatus, StoreClient};

use crate::backoff::Backoff;
use crate::record::Run;

/// Fallback prefix for local runs with no configured prefix
const LOCAL_PREFIX: &str = "L";
/// Fallback prefix for everything else
const UNKNOWN_PREFIX: &str = "U";
/// Default for unspecified run types and unresolvable requestors
const UNKNOWN: &str = "unknown";

/// Parameters of one run submission
///
/// Bundle and test class are required; everything else is optional, with
/// blank strings treated as absent.
///
/// # Example
///
/// ```
/// use runway_runs::RunSubmission;
///
/// let submission = RunSubmission::new("acme.tests", "HelloTest")
///     .run_type("local")
///     .stream("prod")
///     .override_property("zos.image", "SYSA");
/// ```
#[derive(Debug, Clone)]
pub struct RunSubmission {
    bundle_name: String,
    test_name: String,
    run_type: Option<String>,
    requestor: Option<String>,
    group: Option<String>,
    repository: Option<String>,
    obr: Option<String>,
    stream: Option<String>,
    local: bool,
    trace: bool,
    overrides: BTreeMap<String, String>,
}

impl RunSubmission {
    /// Start a submission for the given bundle and test class
    pub fn new(bundle_name: impl Into<String>, test_name: impl Into<String>) -> Self {
        Self {
            bundle_name: bundle_name.into(),
            test_name: test_name.into(),
            run_type: None,
            requestor: None,
            group: None,
            repository: None,
            obr: None,
            stream: None,
            local: false,
            trace: false,
            overrides: BTreeMap::new(),
        }
    }

    /// Run-type classification (defaults to `"unknown"`)
    pub fn run_type(mut self, run_type: impl Into<String>) -> Self {
        self.run_type = Some(run_type.into());
        self
    }

    /// Who requested the run (defaults to configuration, then `"unknown"`)
    pub fn requestor(mut self, requestor: impl Into<String>) -> Self {
        self.requestor = Some(requestor.into());
        self
    }

    /// Group correlation identifier (defaults to a fresh token)
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Artifact repository metadata
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Bundle repository (OBR) metadata
    pub fn obr(mut self, obr: impl Into<String>) -> Self {
        self.obr = Some(obr.into());
        self
    }

    /// Test stream metadata
    pub fn stream(mut self, stream: impl Into<String>) -> Self {
        self.stream = Some(stream.into());
        self
    }

    /// Mark the run as local; local runs are exempt from reset
    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    /// Request trace for the run
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Add one override property for the executor
    pub fn override_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

/// Write-side allocator minting unique run names
///
/// Stateless beyond its collaborators; instances may be cloned and shared.
/// Concurrent `submit` calls within one process are safe for the same reason
/// cross-process submitters are: every caller funnels through the store's
/// compare-and-swap protocol.
#[derive(Clone)]
pub struct RunAllocator {
    store: Arc<dyn StoreClient>,
    config: Arc<dyn ConfigResolver>,
    backoff: Backoff,
}

impl RunAllocator {
    /// Create an allocator with the default contention backoff
    pub fn new(store: Arc<dyn StoreClient>, config: Arc<dyn ConfigResolver>) -> Self {
        Self::with_backoff(store, config, Backoff::new())
    }

    /// Create an allocator with a caller-controlled backoff
    ///
    /// Lets tests inject a seeded or zero-length backoff, and lets an
    /// enclosing service hold the cancellation handle.
    pub fn with_backoff(
        store: Arc<dyn StoreClient>,
        config: Arc<dyn ConfigResolver>,
        backoff: Backoff,
    ) -> Self {
        Self {
            store,
            config,
            backoff,
        }
    }

    /// Allocate a unique run name and install its initial property set
    ///
    /// Returns the record read back from the store, so the result reflects
    /// exactly what was persisted.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] when the bundle or test class is blank, before
    ///   any store access
    /// - [`Error::NumbersExhausted`] after two full wraps of the number space
    /// - [`Error::Interrupted`] when cancelled during a contention backoff
    /// - [`Error::Submission`] wrapping any store failure, with the cause
    ///   attached
    pub fn submit(&self, submission: RunSubmission) -> Result<Run> {
        if submission.bundle_name.trim().is_empty() {
            return Err(Error::Validation("missing bundle name".to_string()));
        }
        if submission.test_name.trim().is_empty() {
            return Err(Error::Validation("missing test name".to_string()));
        }

        self.allocate(submission).map_err(|e| match e {
            // Store failures abort the allocation and surface as submission
            // failures; the taxonomy errors pass through unwrapped.
            Error::Store(_) => Error::submission(e),
            other => other,
        })
    }

    fn allocate(&self, submission: RunSubmission) -> Result<Run> {
        let bundle_test = format!("{}/{}", submission.bundle_name, submission.test_name);

        let run_type = non_blank(submission.run_type.as_deref())
            .unwrap_or(UNKNOWN)
            .to_string();
        let group = non_blank(submission.group.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let requestor = self.resolve_requestor(submission.requestor.as_deref())?;
        let stream = non_blank(submission.stream.as_deref());

        let prefix = self.resolve_prefix(&run_type)?;
        let max_number = self.resolve_max_number(&prefix)?;

        debug!(
            target: "runway::allocator",
            run_type = %run_type,
            prefix = %prefix,
            max_number,
            "allocating run number"
        );

        let counter_key = last_used_key(&prefix);
        let mut wrapped = false;

        // Loop until we own a free number for this prefix
        loop {
            let current_raw = self.store.get(&counter_key)?;
            let current = parse_counter(&counter_key, current_raw.as_deref())?;

            let next = match current.checked_add(1) {
                Some(n) if n <= max_number => n,
                _ => {
                    // Past the maximum: wrap once, fail the second time
                    if wrapped {
                        return Err(Error::NumbersExhausted { prefix });
                    }
                    wrapped = true;
                    1
                }
            };

            if !self
                .store
                .put_swap(&counter_key, current_raw.as_deref(), &next.to_string())?
            {
                // Another allocator won the counter; jitter and re-read
                debug!(target: "runway::allocator", prefix = %prefix, "lost counter swap, retrying");
                self.backoff.wait()?;
                continue;
            }

            let candidate = format!("{prefix}{next}");
            let properties = initial_properties(
                &candidate,
                &submission,
                &run_type,
                &group,
                &requestor,
                stream,
            );

            // Guard on the test key being absent: the name may be taken when
            // the maximum is low or another type shares the prefix
            if !self.store.put_swap_all(
                &run_key(&candidate, "test"),
                None,
                &bundle_test,
                &properties,
            )? {
                debug!(
                    target: "runway::allocator",
                    candidate = %candidate,
                    "run name already taken, retrying"
                );
                self.backoff.wait()?;
                continue;
            }

            info!(
                target: "runway::allocator",
                run = %candidate,
                test = %bundle_test,
                requestor = %requestor,
                "allocated run"
            );

            // Read back so the returned record is exactly what was persisted
            let persisted = self.store.get_prefix(&run_prefix(&candidate))?;
            return Run::from_properties(&candidate, &persisted);
        }
    }

    /// Requestor resolution: explicit value → configured default → "unknown"
    fn resolve_requestor(&self, explicit: Option<&str>) -> Result<String> {
        let requestor = match non_blank(explicit) {
            Some(r) => r.to_string(),
            None => self
                .config
                .get_property("run", "requestor", &[])?
                .as_deref()
                .and_then(non_blank_owned)
                .unwrap_or_else(|| UNKNOWN.to_string()),
        };
        Ok(requestor.to_lowercase())
    }

    /// Prefix resolution: configured per run type, else "L" for local, "U" otherwise
    fn resolve_prefix(&self, run_type: &str) -> Result<String> {
        let configured = self
            .config
            .get_property(&format!("request.type.{run_type}"), "prefix", &[])?;
        Ok(match non_blank(configured.as_deref()) {
            Some(p) => p.to_string(),
            None if run_type == "local" => LOCAL_PREFIX.to_string(),
            None => UNKNOWN_PREFIX.to_string(),
        })
    }

    /// Maximum-number resolution: configured per prefix, else unbounded
    fn resolve_max_number(&self, prefix: &str) -> Result<u64> {
        let configured = self
            .config
            .get_property("request.prefix", "maximum", &[prefix])?;
        match non_blank(configured.as_deref()) {
            Some(s) => s.parse().map_err(|_| {
                Error::Store(format!("configured maximum for prefix {prefix} is not a number: {s}"))
            }),
            None => Ok(u64::MAX),
        }
    }
}

/// Full initial property set for a candidate run name
///
/// Everything except the guard key itself; written atomically alongside it.
fn initial_properties(
    name: &str,
    submission: &RunSubmission,
    run_type: &str,
    group: &str,
    requestor: &str,
    stream: Option<&str>,
) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    let mut put = |property: &str, value: &str| {
        properties.insert(run_key(name, property), value.to_string());
    };

    put("status", RunStatus::Queued.as_str());
    put("queued", &Utc::now().to_rfc3339());
    put("testbundle", &submission.bundle_name);
    put("testclass", &submission.test_name);
    put("request.type", run_type);
    put("local", if submission.local { "true" } else { "false" });
    put("group", group);
    put("requestor", requestor);
    if submission.trace {
        put("trace", "true");
    }
    if let Some(repository) = non_blank(submission.repository.as_deref()) {
        put("repository", repository);
    }
    if let Some(obr) = non_blank(submission.obr.as_deref()) {
        put("obr", obr);
    }
    if let Some(stream) = stream {
        put("stream", stream);
    }
    for (key, value) in &submission.overrides {
        put(&format!("override.{key}"), value);
    }
    properties
}

/// Counter values are decimal strings; absent or blank means zero
fn parse_counter(key: &str, raw: Option<&str>) -> Result<u64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(s) => s
            .parse()
            .map_err(|_| Error::Store(format!("counter {key} is not a number: {s}"))),
    }
}

/// Blank strings are treated as absent
fn non_blank(value: Option<&str>) -> Option<&str> {
    match value {
        Some(s) if !s.trim().is_empty() => Some(s.trim()),
        _ => None,
    }
}

fn non_blank_owned(value: &str) -> Option<String> {
    non_blank(Some(value)).map(str::to_string)
}
