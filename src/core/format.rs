/// Display helpers for site lists

use chrono::{DateTime, Utc};

/// "1 visit", "42 visits", "1.2k visits", "3M visits"
pub fn format_visit_count(count: u32) -> String {
    match count {
        1 => "1 visit".to_string(),
        0..=999 => format!("{} visits", count),
        // 999_950 and up would round to "1000k"
        1_000..=999_949 => format!("{}k visits", compact(count as f64 / 1_000.0)),
        _ => format!("{}M visits", compact(count as f64 / 1_000_000.0)),
    }
}

// One decimal, without a trailing ".0"
fn compact(value: f64) -> String {
    let rounded = format!("{:.1}", value);
    rounded.strip_suffix(".0").map(str::to_string).unwrap_or(rounded)
}

/// Short relative age: "just now", "5m ago", "3h ago", "2d ago", "3w ago",
/// "4mo ago", "2y ago"
///
/// Times in the future read as "just now".
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);

    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    match secs {
        s if s < MINUTE => "just now".to_string(),
        s if s < HOUR => format!("{}m ago", s / MINUTE),
        s if s < DAY => format!("{}h ago", s / HOUR),
        s if s < 7 * DAY => format!("{}d ago", s / DAY),
        s if s < 30 * DAY => format!("{}w ago", s / (7 * DAY)),
        s if s < 365 * DAY => format!("{}mo ago", s / (30 * DAY)),
        s => format!("{}y ago", s / (365 * DAY)),
    }
}

/// Score with at most two decimals, trailing zeros removed
pub fn format_score(score: f64) -> String {
    let text = format!("{:.2}", score);
    let text = text.trim_end_matches('0');
    text.trim_end_matches('.').to_string()
}
