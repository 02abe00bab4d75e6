//! Run record: flat-namespace decode of one run's properties
//!
//! ## Design
//!
//! The store exposes no structured records, only prefixed key/value pairs.
//! [`Run::from_properties`] is the one-way decode from that flat form into a
//! typed record, with explicit defaulting rules:
//!
//! - `test` is required and must split on `/` into exactly two non-empty
//!   segments; anything else fails construction.
//! - `group` defaults to a fresh correlation token only when the property is
//!   absent, never when it is present-but-empty.
//! - `queued` is reconstructed as "now" only when the run's status is queued
//!   and no timestamp was persisted.
//!
//! A record never mutates after construction; every getter is a pure
//! projection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use runway_core::keys::run_key;
use runway_core::{Error, Result, RunStatus};

/// One unit of scheduled or executing work
///
/// Built from the flat `run.<name>.*` property set; see
/// [`Run::from_properties`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    name: String,
    heartbeat: Option<DateTime<Utc>>,
    run_type: String,
    group: String,
    test: String,
    bundle_name: String,
    test_class_name: String,
    status: Option<RunStatus>,
    queued: Option<DateTime<Utc>>,
    requestor: Option<String>,
    stream: Option<String>,
    repository: Option<String>,
    obr: Option<String>,
    local: bool,
    trace: bool,
    overrides: BTreeMap<String, String>,
}

impl Run {
    /// Construct a record from a run's flat property set
    ///
    /// `properties` carries full store keys, as returned by a
    /// `get_prefix("run.<name>.")` scan. Properties outside the run's
    /// namespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] when `test` is missing or does not
    /// split into `<bundle>/<class>`, or when a persisted timestamp does not
    /// parse.
    pub fn from_properties(name: &str, properties: &BTreeMap<String, String>) -> Result<Run> {
        let prop = |p: &str| properties.get(&run_key(name, p)).map(String::as_str);

        let test = prop("test")
            .ok_or_else(|| Error::malformed(name, "missing test property"))?
            .to_string();
        let (bundle_name, test_class_name) = split_test(name, &test)?;

        let heartbeat = parse_timestamp(name, "heartbeat", prop("heartbeat"))?;
        let status = prop("status").map(RunStatus::from);

        let queued = match parse_timestamp(name, "queued", prop("queued"))? {
            Some(ts) => Some(ts),
            // Defensive default: a queued run always has a queued time
            None if status == Some(RunStatus::Queued) => Some(Utc::now()),
            None => None,
        };

        let group = match prop("group") {
            Some(g) => g.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        let overrides = override_properties(name, properties);

        Ok(Run {
            name: name.to_string(),
            heartbeat,
            run_type: prop("request.type").unwrap_or("unknown").to_string(),
            group,
            test,
            bundle_name,
            test_class_name,
            status,
            queued,
            requestor: prop("requestor").map(str::to_string),
            stream: prop("stream").map(str::to_string),
            repository: prop("repository").map(str::to_string),
            obr: prop("obr").map(str::to_string),
            local: prop("local") == Some("true"),
            trace: prop("trace") == Some("true"),
            overrides,
        })
    }

    /// Unique run name, `<prefix><decimal-number>`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Liveness marker written by the executor; presence means actively executing
    pub fn heartbeat(&self) -> Option<DateTime<Utc>> {
        self.heartbeat
    }

    /// Run-type classification, `"unknown"` when never set
    pub fn run_type(&self) -> &str {
        &self.run_type
    }

    /// Correlation identifier shared by runs submitted together
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Test reference, `<bundleName>/<testClassName>`
    pub fn test(&self) -> &str {
        &self.test
    }

    /// Bundle half of the test reference
    pub fn bundle_name(&self) -> &str {
        &self.bundle_name
    }

    /// Class half of the test reference
    pub fn test_class_name(&self) -> &str {
        &self.test_class_name
    }

    /// Lifecycle status, absent when the store holds none for this run
    pub fn status(&self) -> Option<&RunStatus> {
        self.status.as_ref()
    }

    /// When the run was queued; present whenever the status is queued
    pub fn queued(&self) -> Option<DateTime<Utc>> {
        self.queued
    }

    /// Who requested the run (persisted lower-cased)
    pub fn requestor(&self) -> Option<&str> {
        self.requestor.as_deref()
    }

    /// Test stream metadata, if supplied at submission
    pub fn stream(&self) -> Option<&str> {
        self.stream.as_deref()
    }

    /// Artifact repository metadata, if supplied at submission
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    /// Bundle repository (OBR) metadata, if supplied at submission
    pub fn obr(&self) -> Option<&str> {
        self.obr.as_deref()
    }

    /// Local runs are exempt from reset
    pub fn is_local(&self) -> bool {
        self.local
    }

    /// Whether trace was requested at submission
    pub fn is_trace(&self) -> bool {
        self.trace
    }

    /// Caller-supplied override properties, keyed without the `override.` prefix
    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }
}

/// Split a test reference into its bundle and class halves
///
/// The reference must contain exactly one `/` with non-empty text on both
/// sides.
fn split_test(name: &str, test: &str) -> Result<(String, String)> {
    let mut segments = test.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(bundle), Some(class), None) if !bundle.is_empty() && !class.is_empty() => {
            Ok((bundle.to_string(), class.to_string()))
        }
        _ => Err(Error::malformed(
            name,
            format!("test reference {test:?} is not <bundle>/<class>"),
        )),
    }
}

fn parse_timestamp(name: &str, property: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|e| Error::malformed(name, format!("bad {property} timestamp {s:?}: {e}"))),
    }
}

fn override_properties(name: &str, properties: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let override_prefix = run_key(name, "override.");
    properties
        .iter()
        .filter_map(|(k, v)| {
            k.strip_prefix(&override_prefix)
                .map(|suffix| (suffix.to_string(), v.clone()))
        })
        .collect()
}
