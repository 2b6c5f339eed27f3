use crate::config::FeedConfig;
use crate::view::{RenderedPost, View};
use crate::{Error, Result};
use async_trait::async_trait;
use eoka::Page;
use std::time::Duration;
use tracing::debug;

/// Collects every post element's text runs and permalink in one round trip.
/// A post that throws while being read is skipped, not fatal.
const RENDERED_POSTS_JS: &str = r#"(() => {
    const arg = __ARG__;
    const out = [];
    for (const post of document.querySelectorAll(arg.post)) {
        try {
            const runs = Array.from(post.querySelectorAll(arg.text)).map(s => s.innerText || '');
            let href = null;
            try {
                const a = post.querySelector(arg.link);
                href = a ? a.getAttribute('href') : null;
            } catch (_) {}
            out.push({ text_runs: runs, href });
        } catch (_) {}
    }
    return JSON.stringify(out);
})()"#;

/// JSON string literal for embedding in a script.
fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// [`View`] over a live eoka page.
pub struct PageView<'a> {
    page: &'a Page,
}

impl<'a> PageView<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }
}

#[async_trait(?Send)]
impl View for PageView<'_> {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn rendered_posts(&self, feed: &FeedConfig) -> Result<Vec<RenderedPost>> {
        let arg = serde_json::json!({
            "post": feed.post_selector,
            "text": feed.text_selector,
            "link": feed.permalink_selector,
        });
        let js = RENDERED_POSTS_JS.replace("__ARG__", &arg.to_string());
        let raw: String = self.page.evaluate(&js).await?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::ActionFailed(format!("unreadable post snapshot: {}", e)))
    }

    async fn wait_visible(&self, selector: &str, timeout_ms: u64) -> Result<bool> {
        match self.page.wait_for_visible(selector, timeout_ms).await {
            Ok(_) => Ok(true),
            Err(e) => {
                debug!("{} not visible within {}ms: {}", selector, timeout_ms, e);
                Ok(false)
            }
        }
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        let js = format!("!!document.querySelector({})", js_str(selector));
        Ok(self.page.evaluate(&js).await?)
    }

    async fn click(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        match tokio::time::timeout(Duration::from_millis(timeout_ms), self.page.click(selector))
            .await
        {
            Ok(result) => Ok(result?),
            Err(_) => Err(Error::Timeout(format!(
                "click on {} took longer than {}ms",
                selector, timeout_ms
            ))),
        }
    }

    async fn force_click(&self, selector: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.click();
                return true;
            }})()"#,
            js_str(selector)
        );
        let clicked: bool = self.page.evaluate(&js).await?;
        if !clicked {
            return Err(Error::ActionFailed(format!("{} not found", selector)));
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.page.fill(selector, text).await?;
        Ok(())
    }

    async fn press(&self, selector: &str, key: &str) -> Result<()> {
        let js = format!("document.querySelector({})?.focus()", js_str(selector));
        self.page.execute(&js).await?;
        self.page.human().press_key(key).await?;
        Ok(())
    }

    async fn scroll_by(&self, pixels: i64) -> Result<()> {
        self.page
            .execute(&format!("window.scrollBy(0, {})", pixels))
            .await?;
        Ok(())
    }

    async fn pause(&self, ms: u64) {
        self.page.wait(ms).await;
    }
}
