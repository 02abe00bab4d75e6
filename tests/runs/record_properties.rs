//! Property tests for the record decode's split invariant.

use std::collections::BTreeMap;

use proptest::prelude::*;
use runway::{keys, Error, Run};

fn record_with_test(test: &str) -> Result<Run, Error> {
    let mut properties = BTreeMap::new();
    properties.insert(keys::run_key("L1", "test"), test.to_string());
    Run::from_properties("L1", &properties)
}

proptest! {
    #[test]
    fn any_bundle_class_pair_splits_back(
        bundle in "[a-zA-Z][a-zA-Z0-9_.]{0,24}",
        class in "[a-zA-Z][a-zA-Z0-9_.]{0,24}",
    ) {
        let run = record_with_test(&format!("{bundle}/{class}")).unwrap();
        prop_assert_eq!(run.bundle_name(), bundle.as_str());
        prop_assert_eq!(run.test_class_name(), class.as_str());
        let expected_test = format!("{bundle}/{class}");
        prop_assert_eq!(run.test(), expected_test.as_str());
    }

    #[test]
    fn separator_free_references_fail_construction(
        test in "[a-zA-Z0-9_.]{0,32}",
    ) {
        let err = record_with_test(&test).unwrap_err();
        let is_malformed = matches!(err, Error::MalformedRecord { .. });
        prop_assert!(is_malformed);
    }

    #[test]
    fn multi_separator_references_fail_construction(
        a in "[a-zA-Z0-9_.]{1,8}",
        b in "[a-zA-Z0-9_.]{1,8}",
        c in "[a-zA-Z0-9_.]{1,8}",
    ) {
        let err = record_with_test(&format!("{a}/{b}/{c}")).unwrap_err();
        let is_malformed = matches!(err, Error::MalformedRecord { .. });
        prop_assert!(is_malformed);
    }
}
