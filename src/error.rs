/// Error types for frequent-sites
///
/// The scoring engine itself never fails. Everything around it (the site
/// store, import files, URL input) can, and reports through this enum.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for frequent-sites operations
#[derive(Error, Debug)]
pub enum SiteError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Import data was readable JSON but not a valid site export
    #[error("Import error: {0}")]
    Import(String),

    /// URL could not be normalized into a web address
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL carries credentials or tokens
    #[error("URL contains sensitive data and was not recorded")]
    SensitiveUrl,

    /// Stored row could not be turned back into a site
    #[error("Corrupt site record {0}")]
    CorruptRecord(String),

    /// No tracked site matches the given URL or id
    #[error("Site not found: {0}")]
    SiteNotFound(String),

    /// Preset name not in the preset table
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

/// Result type alias for frequent-sites operations
pub type Result<T> = std::result::Result<T, SiteError>;

/// Convert SiteError to a user-friendly error message
impl SiteError {
    pub fn user_message(&self) -> String {
        match self {
            SiteError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            SiteError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            SiteError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            SiteError::Import(reason) => {
                format!("Import rejected: {}", reason)
            }
            SiteError::InvalidUrl(url) => {
                format!("'{}' is not a web address", url)
            }
            SiteError::SensitiveUrl => {
                "URL contains sensitive data and was not recorded".to_string()
            }
            SiteError::CorruptRecord(detail) => {
                format!("A stored site is damaged ({}). Export and re-import to repair", detail)
            }
            SiteError::SiteNotFound(key) => {
                format!("No tracked site for '{}'", key)
            }
            SiteError::UnknownPreset(name) => {
                format!(
                    "Unknown preset '{}'. Try balanced, recency, frequency or pinPriority",
                    name
                )
            }
        }
    }
}
