/// Aggregate statistics over tracked sites
///
/// Blocked sites are counted in `blocked_sites` and nowhere else.

use crate::core::SiteVisit;
use crate::scoring::window_counts;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Visits per domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainStat {
    pub domain: String,
    pub visits: u64,
}

/// Summary of the visible site collection
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    pub total_sites: usize,
    pub visible_sites: usize,
    pub blocked_sites: usize,
    pub pinned_sites: usize, // visible only
    pub total_visits: u64,
    pub visits_last_day: u64,
    pub visits_last_week: u64, // includes the last day
    pub top_domains: Vec<DomainStat>,
}

/// Compute statistics at `now`, keeping the `top_n` busiest domains
pub fn compute_stats(sites: &[SiteVisit], now: DateTime<Utc>, top_n: usize) -> SiteStats {
    let mut stats = SiteStats {
        total_sites: sites.len(),
        ..Default::default()
    };
    let mut per_domain: HashMap<&str, u64> = HashMap::new();

    for site in sites {
        if !site.is_visible() {
            stats.blocked_sites += 1;
            continue;
        }

        stats.visible_sites += 1;
        if site.pinned {
            stats.pinned_sites += 1;
        }

        let visits = site.visit_count as u64;
        stats.total_visits += visits;

        let (day, week) = window_counts(&site.history, now);
        stats.visits_last_day += day as u64;
        stats.visits_last_week += (day + week) as u64;

        *per_domain.entry(site.domain.as_str()).or_insert(0) += visits;
    }

    let mut top: Vec<DomainStat> = per_domain
        .into_iter()
        .map(|(domain, visits)| DomainStat {
            domain: domain.to_string(),
            visits,
        })
        .collect();
    // busiest first, then alphabetical so the output is stable
    top.sort_by(|a, b| b.visits.cmp(&a.visits).then_with(|| a.domain.cmp(&b.domain)));
    top.truncate(top_n);
    stats.top_domains = top;

    stats
}
