//! Convergent timeline sampling.
//!
//! Infinite-scroll feeds render asynchronously and recycle nodes, so the same
//! post shows up across many snapshots. The collector samples, dedups by
//! fingerprint and scrolls until it holds `target` posts or has used up
//! `max_attempts` scroll ticks. A partial sample is a normal result.

use crate::config::FeedConfig;
use crate::post::Post;
use crate::view::{RenderedPost, View};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// Collect up to `feed.target` unique posts from the current page.
///
/// Never fails: enumeration or scroll errors are logged and the tick counts
/// against the attempt budget. Posts are returned in first-seen order.
pub async fn collect<V: View>(view: &V, feed: &FeedConfig) -> Vec<Post> {
    let mut posts: Vec<Post> = Vec::with_capacity(feed.target);
    let mut seen: HashSet<String> = HashSet::new();
    let mut attempts = 0;

    while posts.len() < feed.target && attempts < feed.max_attempts {
        let rendered = match view.rendered_posts(feed).await {
            Ok(r) => r,
            Err(e) => {
                warn!("tick {}: could not enumerate posts: {}", attempts + 1, e);
                Vec::new()
            }
        };

        let before = posts.len();
        for raw in &rendered {
            if posts.len() >= feed.target {
                break;
            }
            let Some(post) = to_post(raw, &feed.base_url) else {
                continue;
            };
            if !seen.insert(post.fingerprint.clone()) {
                continue;
            }
            debug!(
                "collected: {}... url: {:?}",
                preview(&post.content),
                post.url
            );
            posts.push(post);
        }
        debug!(
            "tick {}: {} rendered, {} new, {} total",
            attempts + 1,
            rendered.len(),
            posts.len() - before,
            posts.len()
        );

        if let Err(e) = view.scroll_by(feed.scroll_px).await {
            warn!("tick {}: scroll failed: {}", attempts + 1, e);
        }
        view.pause(feed.settle_ms).await;
        attempts += 1;
    }

    info!(
        "collected {} unique posts in {} ticks",
        posts.len(),
        attempts
    );
    posts
}

fn to_post(raw: &RenderedPost, base_url: &str) -> Option<Post> {
    let url = raw.href.as_deref().and_then(|h| permalink(base_url, h));
    Post::from_text(&raw.text(), url)
}

/// Resolve a possibly relative `href` against the feed's base URL.
fn permalink(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(u) => Some(u.to_string()),
        Err(e) => {
            debug!("unresolvable permalink '{}': {}", href, e);
            None
        }
    }
}

fn preview(content: &str) -> &str {
    match content.char_indices().nth(50) {
        Some((i, _)) => &content[..i],
        None => content,
    }
}
