//! The page surface the collector and the orchestrator drive.

use crate::config::FeedConfig;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// A post element as currently rendered, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RenderedPost {
    /// Text runs of the post body, in document order.
    #[serde(default)]
    pub text_runs: Vec<String>,
    /// Raw `href` of the permalink anchor, possibly relative.
    #[serde(default)]
    pub href: Option<String>,
}

impl RenderedPost {
    pub fn new(text: impl Into<String>, href: Option<&str>) -> Self {
        Self {
            text_runs: vec![text.into()],
            href: href.map(String::from),
        }
    }

    /// Text runs joined with single spaces.
    pub fn text(&self) -> String {
        self.text_runs.join(" ")
    }
}

/// Browser capability, addressed by CSS selector.
///
/// Waits are bounded by the caller-supplied timeout. `wait_visible` reports a
/// timeout as `Ok(false)`; it is not an error.
#[async_trait(?Send)]
pub trait View {
    /// Navigate to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Enumerate the post elements currently in the DOM.
    async fn rendered_posts(&self, feed: &FeedConfig) -> Result<Vec<RenderedPost>>;

    /// Wait up to `timeout_ms` for `selector` to become visible.
    async fn wait_visible(&self, selector: &str, timeout_ms: u64) -> Result<bool>;

    /// Whether `selector` matches anything right now, without waiting.
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// Regular click, abandoned after `timeout_ms`.
    async fn click(&self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// Dispatch a click directly on the element, skipping visibility and
    /// hit-testing checks.
    async fn force_click(&self, selector: &str) -> Result<()>;

    /// Replace the contents of an input or editable region.
    async fn fill(&self, selector: &str, text: &str) -> Result<()>;

    /// Focus `selector` and press `key`.
    async fn press(&self, selector: &str, key: &str) -> Result<()>;

    /// Scroll the viewport down by `pixels`.
    async fn scroll_by(&self, pixels: i64) -> Result<()>;

    /// Let the page settle.
    async fn pause(&self, ms: u64);
}
