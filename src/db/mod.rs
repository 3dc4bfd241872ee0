/// Database module for frequent-sites
///
/// Keeps tracked sites in SQLite using sqlx.
/// The scoring engine never touches this; callers load a snapshot and rank it.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::Database;
pub use models::*;
