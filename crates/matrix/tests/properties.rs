//! Property tests for the axis merge algorithm

use proptest::prelude::*;
use stepx_matrix::{extract_extras, merge};

fn value() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,5}"
}

fn values(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(value(), 0..max)
}

proptest! {
    #[test]
    fn merge_never_produces_duplicates(defaults in values(8), extras in values(8)) {
        let merged = merge(&defaults, Some(&extras.join(" ")));
        let mut seen = std::collections::HashSet::new();
        for value in &merged {
            prop_assert!(seen.insert(value.clone()), "duplicate value {value}");
        }
    }

    #[test]
    fn merge_preserves_default_order(defaults in values(8), extras in values(8)) {
        let merged = merge(&defaults, Some(&extras.join(" ")));
        // Defaults appear in declared order at the front of the result
        let mut expected = Vec::new();
        for value in &defaults {
            if !expected.contains(value) {
                expected.push(value.clone());
            }
        }
        prop_assert_eq!(&merged[..expected.len()], &expected[..]);
    }

    #[test]
    fn merge_is_idempotent(defaults in values(8), extras in values(8)) {
        let once = merge(&defaults, Some(&extras.join(" ")));
        let twice = merge(&once, None);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn every_input_value_is_represented(defaults in values(8), extras in values(8)) {
        let merged = merge(&defaults, Some(&extras.join(" ")));
        for value in defaults.iter().chain(extras.iter()) {
            prop_assert!(merged.contains(value));
        }
    }

    #[test]
    fn round_trip_recovers_non_colliding_extras(defaults in values(6), extras in values(6)) {
        let merged = merge(&defaults, Some(&extras.join(" ")));
        let default_refs: Vec<&str> = defaults.iter().map(String::as_str).collect();
        let recovered = extract_extras(&merged, &default_refs);

        // First-seen extras not colliding with any default, in parse order
        let mut expected: Vec<&str> = Vec::new();
        for extra in &extras {
            if !defaults.contains(extra) && !expected.contains(&extra.as_str()) {
                expected.push(extra);
            }
        }
        prop_assert_eq!(recovered, expected.join(" "));
    }
}
