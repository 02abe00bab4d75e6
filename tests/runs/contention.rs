//! Contention: many submitters racing for run numbers through the CAS
//! protocol must never produce duplicate names.

use std::collections::HashSet;

use runway::Error;

use crate::common::{configure_local_prefix, harness, local_submission, spawn_submitters};

#[test]
fn concurrent_submitters_get_distinct_names() {
    let h = harness();
    configure_local_prefix(&h);

    let handles = spawn_submitters(&h.allocator, 16, |i| {
        local_submission(&format!("Test{i}"))
    });

    let mut names = HashSet::new();
    for handle in handles {
        let run = handle.join().unwrap().unwrap();
        assert!(names.insert(run.name().to_string()), "duplicate name {}", run.name());
    }
    assert_eq!(names.len(), 16);

    // Every allocated name is visible to the registry
    assert_eq!(h.registry.all_runs().unwrap().len(), 16);
}

#[test]
fn concurrent_submitters_with_low_maximum() {
    let h = harness();
    configure_local_prefix(&h);
    h.config.set_property("request.prefix.L.maximum", "8");

    let handles = spawn_submitters(&h.allocator, 12, |i| {
        local_submission(&format!("Test{i}"))
    });

    let mut names = HashSet::new();
    let mut exhausted = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(run) => {
                assert!(names.insert(run.name().to_string()));
            }
            Err(Error::NumbersExhausted { .. }) => exhausted += 1,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    // Exactly the 8 numbers exist; the surplus submitters exhausted the space
    assert_eq!(names.len(), 8);
    assert_eq!(exhausted, 4);
}

#[test]
fn concurrent_submitters_across_prefixes() {
    let h = harness();
    configure_local_prefix(&h);

    let handles = spawn_submitters(&h.allocator, 12, |i| {
        if i % 2 == 0 {
            local_submission(&format!("Test{i}"))
        } else {
            runway::RunSubmission::new("acme.tests", format!("Test{i}"))
        }
    });

    let mut names = HashSet::new();
    for handle in handles {
        let run = handle.join().unwrap().unwrap();
        names.insert(run.name().to_string());
    }

    assert_eq!(names.len(), 12);
    assert_eq!(names.iter().filter(|n| n.starts_with('L')).count(), 6);
    assert_eq!(names.iter().filter(|n| n.starts_with('U')).count(), 6);
}
