use crate::metrics::{extract_metrics, Engagement};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// A post observed in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Visible text, whitespace-collapsed.
    pub content: String,
    /// Dedup key derived from `content`.
    pub fingerprint: String,
    /// Absolute permalink, if one was found.
    pub url: Option<String>,
    #[serde(flatten)]
    pub engagement: Engagement,
}

impl Post {
    /// Build a post from raw visible text. Returns `None` if the text is blank.
    pub fn from_text(text: &str, url: Option<String>) -> Option<Self> {
        let content = normalize(text);
        if content.is_empty() {
            return None;
        }
        Some(Self {
            fingerprint: fingerprint(&content),
            engagement: extract_metrics(&content),
            content,
            url,
        })
    }

    pub fn likes(&self) -> u64 {
        self.engagement.likes
    }

    pub fn retweets(&self) -> u64 {
        self.engagement.retweets
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Hex SHA-256 of the normalized text.
///
/// Stable across processes and releases, so entries in the activity log can
/// be correlated between runs.
pub fn fingerprint(content: &str) -> String {
    hex::encode(Sha256::digest(normalize(content).as_bytes()))
}
