/// Relevance score for a single tracked site
///
/// score = base + last-day visits + last-week visits + decay + pin
///
/// Each term has its own weight in `ScoringConfig`, so swapping presets
/// changes the ranking personality without touching this code.

use crate::core::SiteVisit;
use crate::scoring::ScoringConfig;
use chrono::{DateTime, Utc};

pub const HOUR_MS: i64 = 60 * 60 * 1000;
pub const DAY_MS: i64 = 24 * HOUR_MS;
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// The five score terms, already weighted
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub last_day: f64,
    pub last_week: f64,
    pub decay: f64,
    pub pin: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.base + self.last_day + self.last_week + self.decay + self.pin
    }
}

/// Count history entries in the last-day and last-week windows
///
/// Ages are clamped at zero, so future timestamps land in the day window.
/// An entry belongs to exactly one window:
/// - day: age in `[0, 24h]`
/// - week: age in `(24h, 168h]`
pub fn window_counts(history: &[i64], now: DateTime<Utc>) -> (u32, u32) {
    let now_ms = now.timestamp_millis();

    history.iter().fold((0, 0), |(day, week), &ts| {
        let age = now_ms.saturating_sub(ts).max(0);
        if age <= DAY_MS {
            (day + 1, week)
        } else if age <= WEEK_MS {
            (day, week + 1)
        } else {
            (day, week)
        }
    })
}

/// Fractional days since `last_visit`, never negative
pub fn gap_days(last_visit: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let gap_ms = (now - last_visit).num_milliseconds().max(0);
    gap_ms as f64 / DAY_MS as f64
}

/// Half-life decay multiplier: 1.0 at zero gap, 0.5 at one half-life
pub fn decay_factor(gap_days: f64, half_life_days: f64) -> f64 {
    // validated configs never go below 1, but the scorer takes raw configs too
    let half_life = half_life_days.max(1.0);
    (-std::f64::consts::LN_2 * gap_days.max(0.0) / half_life).exp()
}

/// Score each term separately
pub fn score_breakdown(site: &SiteVisit, now: DateTime<Utc>, config: &ScoringConfig) -> ScoreBreakdown {
    let (day, week) = window_counts(&site.history, now);
    let gap = gap_days(site.last_visit, now);

    ScoreBreakdown {
        base: site.visit_count as f64 * config.w_base,
        last_day: day as f64 * config.w_1d,
        last_week: week as f64 * config.w_7d,
        decay: decay_factor(gap, config.half_life_days) * config.w_decay,
        pin: if site.pinned { config.pin } else { 0.0 },
    }
}

/// Relevance score of one site at `now`
pub fn score(site: &SiteVisit, now: DateTime<Utc>, config: &ScoringConfig) -> f64 {
    score_breakdown(site, now, config).total()
}
