/// Ranking sites by score
///
/// One `now` per call so every site is scored against the same snapshot.
/// Sorting is stable: sites with equal scores keep their input order.

use crate::core::SiteVisit;
use crate::scoring::{score, ScoringConfig};
use chrono::{DateTime, Utc};

/// A site paired with the score it was ranked by
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSite {
    pub site: SiteVisit,
    pub score: f64,
}

/// Rank sites against the wall clock
pub fn rank(sites: &[SiteVisit], config: &ScoringConfig) -> Vec<SiteVisit> {
    rank_at(sites, Utc::now(), config)
}

/// Rank sites against a fixed `now`
pub fn rank_at(sites: &[SiteVisit], now: DateTime<Utc>, config: &ScoringConfig) -> Vec<SiteVisit> {
    rank_scored_at(sites, now, config)
        .into_iter()
        .map(|ranked| ranked.site)
        .collect()
}

/// Rank sites and keep their scores, highest first
pub fn rank_scored_at(sites: &[SiteVisit], now: DateTime<Utc>, config: &ScoringConfig) -> Vec<RankedSite> {
    let mut ranked: Vec<RankedSite> = sites
        .iter()
        .map(|site| RankedSite {
            score: score(site, now, config),
            site: site.clone(),
        })
        .collect();

    // sort_by is stable; total_cmp keeps NaN from panicking the comparator
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    ranked
}

/// The "frequently visited" surface: visible sites only, at most `limit`
pub fn top_sites(
    sites: &[SiteVisit],
    now: DateTime<Utc>,
    config: &ScoringConfig,
    limit: usize,
) -> Vec<RankedSite> {
    let visible: Vec<SiteVisit> = sites.iter().filter(|s| s.is_visible()).cloned().collect();

    let mut ranked = rank_scored_at(&visible, now, config);
    ranked.truncate(limit);
    ranked
}
