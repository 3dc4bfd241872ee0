//! Property-based tests for deterministic history synthesis.
//!
//! Migrating a legacy record twice must produce the same history, so the
//! same `(count, last, seed)` always gives the same timestamps.

use frequent_sites_lib::core::{synthesize_history, MAX_HISTORY};
use frequent_sites_lib::scoring::scorer::HOUR_MS;
use proptest::prelude::*;

const LAST: i64 = 1_750_000_000_000;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn same_inputs_same_history(count in 0u32..500, seed in "[a-z0-9.-]{0,30}") {
        prop_assert_eq!(
            synthesize_history(count, LAST, &seed),
            synthesize_history(count, LAST, &seed)
        );
    }

    #[test]
    fn length_is_capped(count in 0u32..100_000, seed in "[a-z.]{1,20}") {
        let history = synthesize_history(count, LAST, &seed);
        prop_assert_eq!(history.len(), (count as usize).min(MAX_HISTORY));
    }

    #[test]
    fn newest_first_with_bounded_gaps(count in 1u32..200, seed in "[a-z.]{1,20}") {
        let history = synthesize_history(count, LAST, &seed);

        prop_assert_eq!(history[0], LAST);
        for pair in history.windows(2) {
            let gap = pair[0] - pair[1];
            prop_assert!((HOUR_MS..=24 * HOUR_MS).contains(&gap));
        }
    }
}

#[test]
fn example_domain_is_repeatable() {
    let first = synthesize_history(5, LAST, "example.com");
    let second = synthesize_history(5, LAST, "example.com");

    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    assert_ne!(first, synthesize_history(5, LAST, "example.net"));
}
