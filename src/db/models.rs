/// Data models for database entities
///
/// Rows keep timestamps as RFC 3339 text and history as a JSON array,
/// and convert to the `SiteVisit` the rest of the crate works with.

use crate::core::SiteVisit;
use crate::error::{Result, SiteError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `sites` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteRow {
    pub id: String,
    pub url: String,
    pub domain: String,
    pub title: String,
    pub visit_count: i64,
    pub last_visit: String, // RFC 3339
    pub favicon: Option<String>,
    pub pinned: bool,
    pub blocked: bool,
    pub history: String, // JSON array
}

impl SiteRow {
    /// Convert to a `SiteVisit`, rejecting rows that don't parse
    pub fn into_site(self) -> Result<SiteVisit> {
        let last_visit = DateTime::parse_from_rfc3339(&self.last_visit)
            .map_err(|e| SiteError::CorruptRecord(format!("{}: bad last_visit: {}", self.id, e)))?
            .with_timezone(&Utc);

        let history: Vec<i64> = serde_json::from_str(&self.history)
            .map_err(|e| SiteError::CorruptRecord(format!("{}: bad history: {}", self.id, e)))?;

        let visit_count = u32::try_from(self.visit_count).map_err(|_| {
            SiteError::CorruptRecord(format!("{}: visit_count {}", self.id, self.visit_count))
        })?;

        Ok(SiteVisit {
            id: self.id,
            url: self.url,
            domain: self.domain,
            title: self.title,
            visit_count,
            last_visit,
            favicon: self.favicon,
            pinned: self.pinned,
            blocked: self.blocked,
            history,
        })
    }
}

impl TryFrom<&SiteVisit> for SiteRow {
    type Error = SiteError;

    fn try_from(site: &SiteVisit) -> Result<Self> {
        Ok(Self {
            id: site.id.clone(),
            url: site.url.clone(),
            domain: site.domain.clone(),
            title: site.title.clone(),
            visit_count: site.visit_count as i64,
            last_visit: site.last_visit.to_rfc3339(),
            favicon: site.favicon.clone(),
            pinned: site.pinned,
            blocked: site.blocked,
            history: serde_json::to_string(&site.history)?,
        })
    }
}

/// User preference
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Preference {
    pub key: String,
    pub value: String,
}

/// Preference key for the saved ranking preset
pub const PREF_PRESET: &str = "preset";
