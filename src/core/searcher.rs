/// Site searcher with fuzzy matching
///
/// Matches against title, domain and URL at once, so "gh" finds GitHub
/// and "rust book" finds doc.rust-lang.org/book.

use crate::core::SiteVisit;
use crate::db::Database;
use crate::error::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::sync::Arc;

/// A site and how well it matched
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub site: SiteVisit,
    pub score: f64, // Fuzzy match score
}

/// Handles site searching with fuzzy matching
pub struct Searcher {
    db: Arc<Database>,
    matcher: SkimMatcherV2,
}

impl Searcher {
    /// Create a new searcher instance
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Search stored sites with fuzzy matching
    ///
    /// Blocked sites never show up.
    ///
    /// # Arguments
    /// * `query` - Search query
    /// * `limit` - Maximum results to return
    ///
    /// # Returns
    /// * `Ok(Vec<SearchResult>)` - Search results sorted by score
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let sites = self.db.all_sites().await?;
        Ok(self.search_in(sites, query, limit))
    }

    /// Search an already loaded collection
    pub fn search_in(&self, sites: Vec<SiteVisit>, query: &str, limit: usize) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult> = sites
            .into_iter()
            .filter(|site| site.is_visible())
            .filter_map(|site| {
                let haystack = format!("{} {} {}", site.title, site.domain, site.url);
                self.matcher
                    .fuzzy_match(&haystack, query)
                    .map(|score| SearchResult {
                        site,
                        score: score as f64,
                    })
            })
            .collect();

        // Sort by score (highest first)
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        results.truncate(limit);

        results
    }
}
