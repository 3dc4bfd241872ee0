/// Site retriever
///
/// Loads sites from the store and applies user actions (pin, block, delete).
/// Sites are addressed by URL or by id.

use crate::core::site::normalize_url;
use crate::core::SiteVisit;
use crate::db::Database;
use crate::error::{Result, SiteError};
use crate::scoring::{top_sites, RankedSite, ScoringConfig};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// Handles site retrieval operations
pub struct Retriever {
    db: Arc<Database>,
}

impl Retriever {
    /// Create a new retriever instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Frequently visited sites, best first
    pub async fn top(
        &self,
        config: &ScoringConfig,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<RankedSite>> {
        let sites = self.db.all_sites().await?;
        Ok(top_sites(&sites, now, config, limit))
    }

    /// Every stored site, blocked ones included
    pub async fn all(&self) -> Result<Vec<SiteVisit>> {
        self.db.all_sites().await
    }

    /// Find a site by URL (normalized first) or by id
    pub async fn resolve(&self, key: &str) -> Result<SiteVisit> {
        if let Some(url) = normalize_url(key) {
            if let Some(site) = self.db.find_site_by_url(&url).await? {
                return Ok(site);
            }
        }

        self.db
            .get_site(key.trim())
            .await?
            .ok_or_else(|| SiteError::SiteNotFound(key.to_string()))
    }

    /// Pin or unpin a site
    pub async fn set_pinned(&self, key: &str, pinned: bool) -> Result<SiteVisit> {
        let mut site = self.resolve(key).await?;
        self.db.set_pinned(&site.id, pinned).await?;
        site.pinned = pinned;
        info!("{} {}", if pinned { "Pinned" } else { "Unpinned" }, site.url);
        Ok(site)
    }

    /// Hide or unhide a site; its record stays
    pub async fn set_blocked(&self, key: &str, blocked: bool) -> Result<SiteVisit> {
        let mut site = self.resolve(key).await?;
        self.db.set_blocked(&site.id, blocked).await?;
        site.blocked = blocked;
        info!("{} {}", if blocked { "Blocked" } else { "Unblocked" }, site.url);
        Ok(site)
    }

    /// Delete a site for good
    pub async fn delete(&self, key: &str) -> Result<SiteVisit> {
        let site = self.resolve(key).await?;
        self.db.delete_site(&site.id).await?;
        info!("Deleted {}", site.url);
        Ok(site)
    }
}
