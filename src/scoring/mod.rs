/// Scoring module
///
/// Turns visit history into a "frequently visited" ranking.
/// Everything here is pure: no I/O, no clock reads except `rank`.

pub mod config;
pub mod ranker;
pub mod scorer;

pub use config::{preset_config, validate_config, PartialScoringConfig, Preset, ScoringConfig};
pub use ranker::{rank, rank_at, rank_scored_at, top_sites, RankedSite};
pub use scorer::{score, score_breakdown, window_counts, ScoreBreakdown};
