/// Core functionality modules
///
/// Site records and the utilities around the scoring engine: normalization,
/// history synthesis, recording, retrieval, search, import/export, stats.

pub mod format;
pub mod history;
pub mod recorder;
pub mod retriever;
pub mod searcher;
pub mod site;
pub mod stats;
pub mod transfer;

pub use format::{format_relative, format_score, format_visit_count};
pub use history::{backfill_history, seed_from, synthesize_history};
pub use recorder::Recorder;
pub use retriever::Retriever;
pub use searcher::{SearchResult, Searcher};
pub use site::{extract_domain, normalize_url, SiteVisit, MAX_HISTORY};
pub use stats::{compute_stats, DomainStat, SiteStats};
pub use transfer::{export_sites, import_sites, ExportDocument};
