/// frequent-sites library
///
/// Scores and ranks tracked sites for a start page's "frequently visited" row.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod scoring;

// Re-exports for convenience
pub use crate::core::SiteVisit;
pub use db::Database;
pub use error::{Result, SiteError};
pub use scoring::{rank, score, validate_config, Preset, ScoringConfig};
pub use crate::core::synthesize_history;
