// Fabricates visit history for records that only kept a total count
//
// Old exports stored "visited 40 times" and nothing else. The windowed
// score terms need timestamps, so we make up a plausible trail of visits
// leading back from the last one. Same inputs, same trail, every time:
// re-running a migration must not reshuffle anyone's start page.

use crate::core::site::{SiteVisit, MAX_HISTORY};
use crate::scoring::scorer::HOUR_MS;

// Mixed into the seed so an empty key doesn't start xorshift at zero
const SEED_SALT: u32 = 0x9E37_79B9;

/// 32-bit rolling string hash: `h = h * 31 + byte`, wrapping
///
/// Exact values don't matter, only that they never change between runs.
pub fn seed_from(key: &str) -> u32 {
    key.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32))
}

// xorshift32 step. Never returns 0 for a non-zero input.
fn next_state(mut x: u32) -> u32 {
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    x
}

/// Build `min(count, 100)` fake visit timestamps ending at `last_timestamp`
///
/// The first entry is `last_timestamp` itself; each following entry sits
/// 1 to 24 hours before the previous one. Output is most recent first.
///
/// # Arguments
/// * `count` - Total visits the record claims
/// * `last_timestamp` - Most recent visit, epoch millis
/// * `seed_key` - Usually the domain; picks the spacing
pub fn synthesize_history(count: u32, last_timestamp: i64, seed_key: &str) -> Vec<i64> {
    let n = (count as usize).min(MAX_HISTORY);
    let mut history = Vec::with_capacity(n);

    let mut state = seed_from(seed_key) ^ SEED_SALT;
    if state == 0 {
        state = SEED_SALT;
    }

    let mut cursor = last_timestamp;
    for i in 0..n {
        if i > 0 {
            state = next_state(state);
            let offset_hours = (state % 24) as i64 + 1;
            cursor = cursor.saturating_sub(offset_hours * HOUR_MS);
        }
        history.push(cursor);
    }

    history
}

/// Fill in history for a legacy record that has a count but no timestamps
///
/// Returns true if the record was changed.
pub fn backfill_history(site: &mut SiteVisit) -> bool {
    if !site.history.is_empty() || site.visit_count == 0 {
        return false;
    }

    let seed = if site.domain.is_empty() { &site.url } else { &site.domain };
    site.history = synthesize_history(site.visit_count, site.last_visit.timestamp_millis(), seed);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const T: i64 = 1_750_000_000_000;

    #[test]
    fn test_seed_from_known_values() {
        assert_eq!(seed_from(""), 0);
        assert_eq!(seed_from("a"), 97);
        assert_eq!(seed_from("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_synthesis_deterministic() {
        let a = synthesize_history(5, T, "example.com");
        let b = synthesize_history(5, T, "example.com");
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert_eq!(a[0], T);
    }

    #[test]
    fn test_seed_changes_sequence() {
        let a = synthesize_history(10, T, "example.com");
        let b = synthesize_history(10, T, "example.org");
        assert_ne!(a, b);
    }

    #[test]
    fn test_synthesis_spacing_and_order() {
        let history = synthesize_history(50, T, "github.com");
        for pair in history.windows(2) {
            let gap = pair[0] - pair[1];
            assert!(gap >= HOUR_MS && gap <= 24 * HOUR_MS, "gap {} out of range", gap);
        }
    }

    #[test]
    fn test_synthesis_capped() {
        assert_eq!(synthesize_history(5_000, T, "x").len(), MAX_HISTORY);
        assert!(synthesize_history(0, T, "x").is_empty());
    }

    #[test]
    fn test_empty_seed_still_spreads() {
        let history = synthesize_history(3, T, "");
        assert_eq!(history.len(), 3);
        assert!(history[0] > history[1] && history[1] > history[2]);
    }

    #[test]
    fn test_backfill_only_legacy_records() {
        let last = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();
        let mut legacy = SiteVisit {
            id: "1".to_string(),
            url: "https://example.com".to_string(),
            domain: "example.com".to_string(),
            title: "Example".to_string(),
            visit_count: 12,
            last_visit: last,
            favicon: None,
            pinned: false,
            blocked: false,
            history: vec![],
        };

        assert!(backfill_history(&mut legacy));
        assert_eq!(legacy.history.len(), 12);
        assert_eq!(legacy.history[0], last.timestamp_millis());
        assert_eq!(
            legacy.history,
            synthesize_history(12, last.timestamp_millis(), "example.com")
        );

        // already has history
        assert!(!backfill_history(&mut legacy));

        let mut never_visited = legacy.clone();
        never_visited.history.clear();
        never_visited.visit_count = 0;
        assert!(!backfill_history(&mut never_visited));
    }
}
