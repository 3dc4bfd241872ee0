/// Tracked site records and URL normalization
///
/// A `SiteVisit` is one tracked site, not one visit. The name stuck because
/// the record grows a new history entry every time the site is opened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most history entries a single site keeps
pub const MAX_HISTORY: usize = 100;

/// One tracked site with its visit history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteVisit {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub title: String,
    pub visit_count: u32,
    pub last_visit: DateTime<Utc>, // serialized as RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub history: Vec<i64>, // epoch millis, any order
}

impl SiteVisit {
    /// Create a record for a first visit at `now`
    pub fn first_visit(id: String, url: String, domain: String, title: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            url,
            domain,
            title,
            visit_count: 1,
            last_visit: now,
            favicon: None,
            pinned: false,
            blocked: false,
            history: vec![now.timestamp_millis()],
        }
    }

    /// Count one more visit at `now`
    ///
    /// History is capped at `MAX_HISTORY`; the oldest entries fall off.
    pub fn record_visit(&mut self, now: DateTime<Utc>) {
        self.visit_count = self.visit_count.saturating_add(1);
        if now > self.last_visit {
            self.last_visit = now;
        }
        self.history.push(now.timestamp_millis());
        self.cap_history();
    }

    /// Keep only the newest `MAX_HISTORY` entries
    pub fn cap_history(&mut self) {
        if self.history.len() > MAX_HISTORY {
            self.history.sort_unstable_by(|a, b| b.cmp(a));
            self.history.truncate(MAX_HISTORY);
        }
    }

    /// Visible sites show up in rankings and statistics
    pub fn is_visible(&self) -> bool {
        !self.blocked
    }
}

/// Leading `scheme:` of a URL, if the text before the first colon is a
/// syntactically valid scheme
fn leading_scheme(s: &str) -> Option<&str> {
    let (candidate, _) = s.split_once(':')?;
    let mut chars = candidate.chars();
    let first = chars.next()?;
    if first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
    {
        Some(candidate)
    } else {
        None
    }
}

/// Normalize a user-supplied URL
///
/// - Trims whitespace
/// - Adds `https://` when no scheme is given
/// - Lowercases scheme and host
/// - Drops the fragment and a trailing slash
///
/// Returns `None` for empty input and for non-web schemes
/// (`about:`, `chrome:`, `file:`, `javascript:` ...).
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let with_scheme = match leading_scheme(trimmed) {
        Some(scheme) => {
            let scheme = scheme.to_lowercase();
            if scheme != "http" && scheme != "https" {
                // "localhost:3000" parses as scheme "localhost"
                if trimmed.contains("://") || !looks_like_host_port(trimmed) {
                    return None;
                }
                format!("https://{}", trimmed)
            } else {
                trimmed.to_string()
            }
        }
        None => format!("https://{}", trimmed),
    };

    let (scheme, rest) = with_scheme.split_once("://")?;
    let rest = rest.split('#').next().unwrap_or("");
    let (host, path) = match rest.find(['/', '?']) {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    if host.is_empty() || host.contains(char::is_whitespace) {
        return None;
    }

    let path = path.strip_suffix('/').unwrap_or(path);
    Some(format!("{}://{}{}", scheme.to_lowercase(), host.to_lowercase(), path))
}

fn looks_like_host_port(s: &str) -> bool {
    match s.split_once(':') {
        Some((_, after)) => after
            .split(['/', '?', '#'])
            .next()
            .map(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false),
        None => false,
    }
}

/// Extract the display domain from a URL
///
/// Strips scheme, credentials, port and a leading `www.`.
pub fn extract_domain(url: &str) -> Option<String> {
    let normalized = normalize_url(url)?;
    let (_, rest) = normalized.split_once("://")?;
    let authority = rest.split(['/', '?']).next().unwrap_or("");
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);
    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize_url("github.com").as_deref(), Some("https://github.com"));
        assert_eq!(
            normalize_url("  HTTP://Example.COM/Path/  ").as_deref(),
            Some("http://example.com/Path")
        );
    }

    #[test]
    fn test_normalize_drops_fragment() {
        assert_eq!(
            normalize_url("https://docs.rs/serde#derive").as_deref(),
            Some("https://docs.rs/serde")
        );
    }

    #[test]
    fn test_normalize_host_port() {
        assert_eq!(
            normalize_url("localhost:3000/app").as_deref(),
            Some("https://localhost:3000/app")
        );
    }

    #[test]
    fn test_normalize_rejects_non_web() {
        assert!(normalize_url("").is_none());
        assert!(normalize_url("about:blank").is_none());
        assert!(normalize_url("chrome://settings").is_none());
        assert!(normalize_url("file:///etc/hosts").is_none());
        assert!(normalize_url("javascript:alert(1)").is_none());
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.youtube.com/watch?v=1").as_deref(), Some("youtube.com"));
        assert_eq!(extract_domain("news.ycombinator.com").as_deref(), Some("news.ycombinator.com"));
        assert_eq!(extract_domain("http://user@host.io:8080/x").as_deref(), Some("host.io"));
        assert!(extract_domain("about:blank").is_none());
    }

    #[test]
    fn test_record_visit_updates_counters() {
        let mut site = SiteVisit::first_visit(
            "1".into(),
            "https://a.com".into(),
            "a.com".into(),
            "A".into(),
            at(8),
        );
        site.record_visit(at(10));

        assert_eq!(site.visit_count, 2);
        assert_eq!(site.last_visit, at(10));
        assert_eq!(site.history.len(), 2);
    }

    #[test]
    fn test_record_visit_caps_history() {
        let start = at(0);
        let mut site = SiteVisit::first_visit("1".into(), "u".into(), "d".into(), "t".into(), start);
        for i in 1..=150 {
            site.record_visit(start + Duration::minutes(i));
        }

        assert_eq!(site.visit_count, 151);
        assert_eq!(site.history.len(), MAX_HISTORY);
        // newest kept
        assert_eq!(site.history[0], (start + Duration::minutes(150)).timestamp_millis());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "id": "x",
            "url": "https://x.dev",
            "domain": "x.dev",
            "title": "X",
            "visitCount": 3,
            "lastVisit": "2025-03-01T10:00:00Z"
        }"#;
        let site: SiteVisit = serde_json::from_str(json).unwrap();
        assert!(site.history.is_empty());
        assert!(!site.pinned);
        assert!(site.is_visible());
    }
}
