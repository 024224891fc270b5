//! Video identifier extraction.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// An 11-character platform video identifier.
///
/// Derived deterministically from a URL; a string that matches no supported
/// URL shape yields no identifier at all rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Extract a video ID from a URL.
    ///
    /// Patterns are tried in a fixed priority order: standard watch URLs,
    /// short links, embed URLs, legacy /v/ URLs, then mobile-subdomain watch
    /// URLs. The first match wins; no match returns `None`. Never fails.
    pub fn extract(url: &str) -> Option<Self> {
        let input = url.trim();
        for pattern in url_patterns() {
            if let Some(id) = pattern.captures(input).and_then(|caps| caps.get(1)) {
                return Some(VideoId(id.as_str().to_string()));
            }
        }
        None
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported URL shapes, in priority order.
///
/// Each pattern captures exactly 11 ID characters and requires the match to
/// end at a non-ID character, so longer tokens are rejected rather than
/// truncated.
fn url_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?:https?://)?(?:www\.)?youtube\.com/watch\?[^#\s]*?\bv=([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
            r"(?:https?://)?youtu\.be/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
            r"(?:https?://)?(?:www\.)?youtube\.com/embed/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
            r"(?:https?://)?(?:www\.)?youtube\.com/v/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
            r"(?:https?://)?m\.youtube\.com/watch\?[^#\s]*?\bv=([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid video URL pattern"))
        .collect()
    })
}
