// Records site visits to the database
//
// Filters out stuff we shouldn't keep, like URLs with tokens in them

use crate::core::site::{extract_domain, normalize_url, SiteVisit};
use crate::db::Database;
use crate::error::{Result, SiteError};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

// Nobody bookmarks a 10KB URL on purpose
const MAX_URL_LENGTH: usize = 4_096;

// URLs that carry secrets. Recording these would leak them into exports.
const SENSITIVE_PATTERNS: &[&str] = &[
    r"[?&](access_|id_|refresh_)?token=",
    r"[?&]api[_-]?key=",
    r"[?&](password|passwd|pwd)=",
    r"[?&]session(_?id)?=",
    r"[?&](code|state)=[^&]{16,}", // oauth callbacks
    r"^https?://[^/@]+:[^/@]+@",   // inline credentials
];

pub struct Recorder {
    db: Arc<Database>,
    sensitive_regex: Vec<Regex>,
}

impl Recorder {
    pub fn new(db: Arc<Database>) -> Self {
        // Build all the regex patterns once so we don't recompile them every time
        let sensitive_regex = SENSITIVE_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            db,
            sensitive_regex,
        }
    }

    // Main recording function. Checks the URL is safe, normalizes it, bumps or creates the site.
    // Non-web schemes (about:, chrome:, javascript: ...) fail normalization and come back as InvalidUrl.
    pub async fn record(&self, url: &str, title: Option<&str>, now: DateTime<Utc>) -> Result<SiteVisit> {
        let normalized = self.validate_url(url)?;
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        self.db
            .update_site_by_url(&normalized, |existing| match existing {
                Some(mut site) => {
                    site.record_visit(now);
                    if let Some(title) = title {
                        site.title = title;
                    }
                    Ok(site)
                }
                None => {
                    let domain = extract_domain(&normalized)
                        .ok_or_else(|| SiteError::InvalidUrl(url.to_string()))?;
                    let title = title.unwrap_or_else(|| domain.clone());

                    debug!("First visit to {}", normalized);
                    Ok(SiteVisit::first_visit(
                        Uuid::new_v4().to_string(),
                        normalized.clone(),
                        domain,
                        title,
                        now,
                    ))
                }
            })
            .await
    }

    // Normalize, then make sure it's worth keeping
    fn validate_url(&self, url: &str) -> Result<String> {
        let trimmed = url.trim();
        if trimmed.len() > MAX_URL_LENGTH {
            return Err(SiteError::InvalidUrl(format!("longer than {} characters", MAX_URL_LENGTH)));
        }

        let normalized = normalize_url(trimmed).ok_or_else(|| SiteError::InvalidUrl(trimmed.to_string()))?;

        if self.contains_sensitive_data(&normalized) {
            return Err(SiteError::SensitiveUrl);
        }

        Ok(normalized)
    }

    /// Check if a URL carries tokens, keys or credentials
    fn contains_sensitive_data(&self, url: &str) -> bool {
        let lowercase = url.to_lowercase();

        self.sensitive_regex
            .iter()
            .any(|regex| regex.is_match(&lowercase))
    }
}
