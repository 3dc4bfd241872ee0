// Import/export of site collections as JSON
//
// Export writes a versioned document. Import takes that document or a bare
// array of sites (what older versions wrote). Corrupt input is rejected
// with a reason instead of being half-imported.

use crate::core::history::backfill_history;
use crate::core::site::{extract_domain, normalize_url, SiteVisit};
use crate::error::{Result, SiteError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

/// Current export format version
pub const EXPORT_VERSION: u64 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u64,
    pub exported_at: DateTime<Utc>,
    pub sites: Vec<SiteVisit>,
}

/// Serialize sites into a pretty-printed export document
pub fn export_sites(sites: &[SiteVisit], now: DateTime<Utc>) -> Result<String> {
    let document = ExportDocument {
        version: EXPORT_VERSION,
        exported_at: now,
        sites: sites.to_vec(),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse and validate an export document or a bare list of sites
///
/// URLs are normalized the way the recorder stores them, and each id and
/// each URL may appear only once. Records without a domain get one from
/// their URL. Records with a visit count but no history get a synthesized
/// history, and history is capped at `MAX_HISTORY` entries.
pub fn import_sites(json: &str) -> Result<Vec<SiteVisit>> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SiteError::Import(format!("not valid JSON: {}", e)))?;

    let raw_sites = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .ok_or_else(|| SiteError::Import("missing \"version\" field".to_string()))?
                .as_u64()
                .ok_or_else(|| SiteError::Import("\"version\" must be a positive integer".to_string()))?;

            if version != EXPORT_VERSION {
                return Err(SiteError::Import(format!(
                    "unsupported export version {} (expected {})",
                    version, EXPORT_VERSION
                )));
            }

            map.remove("sites")
                .ok_or_else(|| SiteError::Import("missing \"sites\" field".to_string()))?
        }
        _ => {
            return Err(SiteError::Import(
                "expected an export document or a list of sites".to_string(),
            ))
        }
    };

    let mut sites: Vec<SiteVisit> = serde_json::from_value(raw_sites)
        .map_err(|e| SiteError::Import(format!("invalid site record: {}", e)))?;

    let mut seen_ids = HashSet::new();
    let mut seen_urls = HashSet::new();
    for (index, site) in sites.iter_mut().enumerate() {
        validate_record(site, index)?;

        if !seen_ids.insert(site.id.clone()) {
            return Err(SiteError::Import(format!("duplicate id '{}'", site.id)));
        }
        if !seen_urls.insert(site.url.clone()) {
            return Err(SiteError::Import(format!(
                "duplicate url '{}' (site '{}')",
                site.url, site.id
            )));
        }

        if backfill_history(site) {
            debug!("Synthesized {} history entries for {}", site.history.len(), site.domain);
        }
        site.cap_history();
    }

    info!("Parsed {} sites from import data", sites.len());
    Ok(sites)
}

// Reject records that would be unusable; repair the ones that are merely incomplete
fn validate_record(site: &mut SiteVisit, index: usize) -> Result<()> {
    site.id = site.id.trim().to_string();
    if site.id.is_empty() {
        return Err(SiteError::Import(format!("site #{} has an empty id", index)));
    }

    if site.url.trim().is_empty() {
        return Err(SiteError::Import(format!("site '{}' has an empty url", site.id)));
    }

    // Same form the recorder looks sites up by
    site.url = normalize_url(&site.url).ok_or_else(|| {
        SiteError::Import(format!("site '{}' has an unusable url '{}'", site.id, site.url))
    })?;

    if site.domain.trim().is_empty() {
        site.domain = extract_domain(&site.url).ok_or_else(|| {
            SiteError::Import(format!("site '{}' has an unusable url '{}'", site.id, site.url))
        })?;
    }

    if site.title.trim().is_empty() {
        site.title = site.domain.clone();
    }

    Ok(())
}
