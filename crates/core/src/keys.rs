//! Authoritative store key namespace
//!
//! ## Layout
//!
//! All run state lives under flat string keys in the shared store:
//!
//! - `run.<name>.test` = `<bundle>/<class>` — existence marker and the guard
//!   key for the allocator's atomic install
//! - `run.<name>.status`, `.queued`, `.heartbeat`, `.request.type`, `.local`,
//!   `.trace`, `.repository`, `.obr`, `.stream`, `.group`, `.requestor`,
//!   `.testbundle`, `.testclass`
//! - `run.<name>.override.<key>` — one entry per submission override
//! - `request.prefix.<prefix>.lastused` — decimal allocation counter
//! - `request.type.<runType>.prefix`, `request.prefix.<prefix>.maximum` —
//!   resolved through configuration, never written by this core
//!
//! Run names are `<prefix><decimal-number>` and match `\w+` when they appear
//! as the second segment of a `run.` key.

/// Prefix under which every run's properties live
pub const RUN_PREFIX: &str = "run.";

/// Property namespace prefix for one run: `run.<name>.`
pub fn run_prefix(name: &str) -> String {
    format!("{RUN_PREFIX}{name}.")
}

/// Full key for one property of one run: `run.<name>.<property>`
pub fn run_key(name: &str, property: &str) -> String {
    format!("{RUN_PREFIX}{name}.{property}")
}

/// Allocation counter key for a run-name prefix: `request.prefix.<prefix>.lastused`
pub fn last_used_key(prefix: &str) -> String {
    format!("request.prefix.{prefix}.lastused")
}

/// Extract the run name from a scanned store key
///
/// Returns the `<name>` of a `run.<name>.<property>` key, or `None` when the
/// key is not shaped like a run property. Names are word characters only
/// (letters, digits, underscore).
pub fn run_name_of(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(RUN_PREFIX)?;
    let dot = rest.find('.')?;
    let name = &rest[..dot];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(name)
}
