//! Property-based tests for the scoring engine.
//!
//! These check the ranking guarantees a start page relies on: more visits
//! never hurt, a pin is worth exactly its bonus, decay halves at the
//! half-life, the day and week windows never double count, validation is
//! idempotent and ranking is deterministic.

use chrono::{DateTime, Duration, TimeZone, Utc};
use frequent_sites_lib::scoring::scorer::{DAY_MS, HOUR_MS};
use frequent_sites_lib::scoring::{
    rank_at, score, validate_config, window_counts, PartialScoringConfig, Preset, ScoringConfig,
};
use frequent_sites_lib::SiteVisit;
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// History entries up to ten days old, plus a few in the future
fn arb_history() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-2 * HOUR_MS..10 * DAY_MS, 0..40)
        .prop_map(|ages| ages.into_iter().map(|age| now().timestamp_millis() - age).collect())
}

fn arb_site() -> impl Strategy<Value = SiteVisit> {
    (
        "[a-z]{3,10}",
        0u32..10_000,
        any::<bool>(),
        arb_history(),
        -48i64..24 * 400,
    )
        .prop_map(|(name, visit_count, pinned, history, gap_hours)| SiteVisit {
            id: name.clone(),
            url: format!("https://{}.com", name),
            domain: format!("{}.com", name),
            title: name,
            visit_count,
            last_visit: now() - Duration::hours(gap_hours),
            favicon: None,
            pinned,
            blocked: false,
            history,
        })
}

fn arb_preset() -> impl Strategy<Value = Preset> {
    prop::sample::select(Preset::ALL.to_vec())
}

/// Any f64 including NaN, infinities and negatives
fn arb_weight() -> impl Strategy<Value = Option<f64>> {
    proptest::option::of(prop_oneof![
        -1_000.0f64..1_000.0,
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(0.0),
    ])
}

fn arb_partial() -> impl Strategy<Value = PartialScoringConfig> {
    (
        arb_weight(),
        arb_weight(),
        arb_weight(),
        arb_weight(),
        arb_weight(),
        arb_weight(),
    )
        .prop_map(|(w_base, w_1d, w_7d, w_decay, pin, half_life_days)| PartialScoringConfig {
            w_base,
            w_1d,
            w_7d,
            w_decay,
            pin,
            half_life_days,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn more_visits_never_lower_score(site in arb_site(), extra in 1u32..1_000, preset in arb_preset()) {
        let config = preset.config();
        let mut busier = site.clone();
        busier.visit_count = site.visit_count.saturating_add(extra);

        prop_assert!(score(&busier, now(), &config) >= score(&site, now(), &config));
    }

    #[test]
    fn pin_adds_exactly_the_bonus(site in arb_site(), preset in arb_preset()) {
        let config = preset.config();
        let mut pinned = site.clone();
        pinned.pinned = true;
        let mut unpinned = site;
        unpinned.pinned = false;

        let diff = score(&pinned, now(), &config) - score(&unpinned, now(), &config);
        prop_assert!((diff - config.pin).abs() < 1e-6);
    }

    #[test]
    fn decay_halves_at_half_life(half_life in 1u32..365, w_decay in 0.0f64..100.0, site in arb_site()) {
        let config = ScoringConfig {
            w_base: 0.0,
            w_1d: 0.0,
            w_7d: 0.0,
            w_decay,
            pin: 0.0,
            half_life_days: half_life as f64,
        };
        let mut fresh = site.clone();
        fresh.pinned = false;
        fresh.last_visit = now();
        let mut stale = fresh.clone();
        stale.last_visit = now() - Duration::days(half_life as i64);

        let at_zero = score(&fresh, now(), &config);
        let at_half = score(&stale, now(), &config);
        prop_assert!((at_half - at_zero / 2.0).abs() < 1e-9);
    }

    #[test]
    fn windows_never_double_count(history in arb_history()) {
        let (day, week) = window_counts(&history, now());
        let recent = history
            .iter()
            .filter(|&&ts| now().timestamp_millis() - ts <= 7 * DAY_MS)
            .count() as u32;

        prop_assert_eq!(day + week, recent);
    }

    #[test]
    fn validation_is_idempotent(partial in arb_partial()) {
        let once = validate_config(&partial);
        let twice = validate_config(&once.into());

        prop_assert_eq!(once, twice);
        prop_assert!(once.w_base >= 0.0 && once.w_1d >= 0.0 && once.w_7d >= 0.0);
        prop_assert!(once.w_decay >= 0.0 && once.pin >= 0.0);
        prop_assert!(once.half_life_days >= 1.0);
    }

    #[test]
    fn ranking_is_deterministic(sites in prop::collection::vec(arb_site(), 0..20), preset in arb_preset()) {
        let config = preset.config();
        let first = rank_at(&sites, now(), &config);
        let second = rank_at(&sites, now(), &config);

        prop_assert_eq!(first.len(), sites.len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ranking_is_sorted(sites in prop::collection::vec(arb_site(), 0..20), preset in arb_preset()) {
        let config = preset.config();
        let ranked = rank_at(&sites, now(), &config);

        for pair in ranked.windows(2) {
            prop_assert!(score(&pair[0], now(), &config) >= score(&pair[1], now(), &config));
        }
    }
}

#[test]
fn end_to_end_pinned_site_wins_under_balanced() {
    let config = Preset::Balanced.config();
    let a = SiteVisit {
        id: "a".to_string(),
        url: "https://a.com".to_string(),
        domain: "a.com".to_string(),
        title: "A".to_string(),
        visit_count: 10,
        last_visit: now() - Duration::hours(1),
        favicon: None,
        pinned: false,
        blocked: false,
        history: vec![(now() - Duration::hours(1)).timestamp_millis()],
    };
    let b = SiteVisit {
        id: "b".to_string(),
        url: "https://b.com".to_string(),
        domain: "b.com".to_string(),
        title: "B".to_string(),
        visit_count: 2,
        last_visit: now() - Duration::hours(1),
        favicon: None,
        pinned: true,
        blocked: false,
        history: vec![],
    };

    let diff = score(&b, now(), &config) - score(&a, now(), &config);
    // same last visit, so the decay terms cancel: 150 - 8 - 3
    assert!((diff - 139.0).abs() < 1e-9);

    let ranked = rank_at(&[a, b], now(), &config);
    assert_eq!(ranked[0].id, "b");
}
