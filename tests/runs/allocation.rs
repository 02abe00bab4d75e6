//! Allocation behavior: the submission scenario, round-trips, and the
//! wraparound rules of the number space.

use runway::{Error, RunStatus, RunSubmission, StoreClient};
use uuid::Uuid;

use crate::common::{configure_local_prefix, harness, local_submission};

#[test]
fn local_submission_scenario() {
    let h = harness();
    configure_local_prefix(&h);

    let run = h
        .allocator
        .submit(local_submission("HelloTest").local(true))
        .unwrap();

    // Name is L<n> for some n >= 1
    let number: u64 = run.name().strip_prefix('L').unwrap().parse().unwrap();
    assert!(number >= 1);

    assert_eq!(run.status(), Some(&RunStatus::Queued));
    assert!(run.is_local());
    assert_eq!(run.requestor(), Some("unknown"));
    assert_eq!(run.bundle_name(), "acme.tests");
    assert_eq!(run.test_class_name(), "HelloTest");

    // Group is a freshly generated non-empty token
    assert!(!run.group().is_empty());
    assert!(Uuid::parse_str(run.group()).is_ok());
}

#[test]
fn submit_then_get_run_round_trips() {
    let h = harness();
    configure_local_prefix(&h);

    let submitted = h
        .allocator
        .submit(
            local_submission("HelloTest")
                .local(true)
                .requestor("Alice")
                .group("nightly")
                .stream("prod")
                .repository("https://repo.example/maven")
                .obr("mvn:acme/obr/0.1.0/obr")
                .trace(true)
                .override_property("zos.image", "SYSA"),
        )
        .unwrap();

    let fetched = h.registry.get_run(submitted.name()).unwrap().unwrap();
    assert_eq!(fetched, submitted);
}

#[test]
fn numbers_are_strictly_increasing_without_maximum() {
    let h = harness();
    configure_local_prefix(&h);

    let mut last = 0;
    for _ in 0..10 {
        let run = h.allocator.submit(local_submission("HelloTest")).unwrap();
        let number: u64 = run.name().strip_prefix('L').unwrap().parse().unwrap();
        assert!(number > last);
        last = number;
    }
}

#[test]
fn allocation_wraps_at_configured_maximum() {
    let h = harness();
    configure_local_prefix(&h);
    h.config.set_property("request.prefix.L.maximum", "4");

    for expected in ["L1", "L2", "L3", "L4"] {
        let run = h.allocator.submit(local_submission("HelloTest")).unwrap();
        assert_eq!(run.name(), expected);
    }

    // All numbers taken: a further submission wraps twice and gives up
    let err = h.allocator.submit(local_submission("HelloTest")).unwrap_err();
    assert!(matches!(err, Error::NumbersExhausted { ref prefix } if prefix.as_str() == "L"));

    // Freeing a number makes the wrap succeed
    assert!(h.registry.delete("L3").unwrap());
    let run = h.allocator.submit(local_submission("HelloTest")).unwrap();
    assert_eq!(run.name(), "L3");
}

#[test]
fn prefixes_are_independent() {
    let h = harness();
    configure_local_prefix(&h);

    let local = h.allocator.submit(local_submission("HelloTest")).unwrap();
    let unknown = h
        .allocator
        .submit(RunSubmission::new("acme.tests", "HelloTest"))
        .unwrap();

    assert_eq!(local.name(), "L1");
    assert_eq!(unknown.name(), "U1");
}

#[test]
fn validation_failures_never_touch_the_store() {
    let h = harness();

    assert!(matches!(
        h.allocator.submit(RunSubmission::new("", "HelloTest")),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        h.allocator.submit(RunSubmission::new("acme.tests", "")),
        Err(Error::Validation(_))
    ));
    assert!(h.store.is_empty());
}

#[test]
fn store_failures_surface_as_submission_errors_with_cause() {
    let h = harness();
    h.store.put("request.prefix.U.lastused", "garbage").unwrap();

    let err = h
        .allocator
        .submit(RunSubmission::new("acme.tests", "HelloTest"))
        .unwrap_err();

    let Error::Submission(cause) = err else {
        panic!("expected submission wrapper, got {err:?}");
    };
    assert!(matches!(*cause, Error::Store(_)));
}
