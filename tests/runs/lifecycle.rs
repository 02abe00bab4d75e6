//! Lifecycle mutations through the registry: delete and reset against runs
//! the allocator actually created.

use chrono::Utc;
use runway::{keys, RunStatus, StoreClient};

use crate::common::{configure_local_prefix, harness, local_submission};

#[test]
fn delete_removes_the_whole_namespace() {
    let h = harness();
    configure_local_prefix(&h);

    let run = h
        .allocator
        .submit(local_submission("HelloTest").override_property("zos.image", "SYSA"))
        .unwrap();

    assert!(!h.registry.delete("unknown").unwrap());
    assert!(h.registry.delete(run.name()).unwrap());
    assert!(h.registry.get_run(run.name()).unwrap().is_none());

    // Nothing of the run survives, only the allocation counter
    assert_eq!(h.store.len(), 1);
    assert_eq!(
        h.store.get("request.prefix.L.lastused").unwrap(),
        Some("1".to_string())
    );
}

#[test]
fn reset_requeues_an_allocated_run() {
    let h = harness();
    configure_local_prefix(&h);

    let run = h.allocator.submit(local_submission("HelloTest")).unwrap();
    let name = run.name();

    // Executor claims the run and starts heartbeating
    h.store.put(&keys::run_key(name, "status"), "allocated").unwrap();
    h.store
        .put(&keys::run_key(name, "heartbeat"), &Utc::now().to_rfc3339())
        .unwrap();

    assert!(h.registry.reset(name).unwrap());

    let after = h.registry.get_run(name).unwrap().unwrap();
    assert_eq!(after.heartbeat(), None);
    assert_eq!(after.status(), Some(&RunStatus::Queued));
    assert_eq!(after.test(), run.test());
    assert_eq!(after.group(), run.group());
}

#[test]
fn reset_refuses_local_runs_and_changes_nothing() {
    let h = harness();
    configure_local_prefix(&h);

    let run = h
        .allocator
        .submit(local_submission("HelloTest").local(true))
        .unwrap();
    let name = run.name();

    h.store.put(&keys::run_key(name, "status"), "allocated").unwrap();
    h.store
        .put(&keys::run_key(name, "heartbeat"), &Utc::now().to_rfc3339())
        .unwrap();

    assert!(!h.registry.reset(name).unwrap());

    let after = h.registry.get_run(name).unwrap().unwrap();
    assert!(after.heartbeat().is_some());
    assert_eq!(after.status(), Some(&RunStatus::Allocated));
}

#[test]
fn reset_of_unknown_run_reports_not_found() {
    let h = harness();
    assert!(!h.registry.reset("L404").unwrap());
}
