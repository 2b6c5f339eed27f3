//! Scripted collaborators for driving the collector and orchestrator
//! without a browser.

#![allow(dead_code)]

use async_trait::async_trait;
use feedpilot::{ActivityLog, Error, FeedConfig, LogEntry, RenderedPost, ReplyGenerator, Result, View};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// A page whose contents are scripted per scroll tick.
///
/// `frames[i]` is what is rendered after `i` scrolls; past the end the last
/// frame stays on screen, like an exhausted feed.
#[derive(Default)]
pub struct FakeView {
    frames: Vec<Vec<RenderedPost>>,
    visible: HashSet<String>,
    click_fails: HashSet<String>,
    force_fails: HashSet<String>,
    goto_fails: bool,
    fill_fails: bool,
    enumerate_fails_on: HashSet<usize>,
    scrolls: Cell<usize>,
    actions: RefCell<Vec<String>>,
}

impl FakeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(mut self, frames: Vec<Vec<RenderedPost>>) -> Self {
        self.frames = frames;
        self
    }

    /// Make `selector` visible and present.
    pub fn show(mut self, selector: &str) -> Self {
        self.visible.insert(selector.to_string());
        self
    }

    pub fn click_fails(mut self, selector: &str) -> Self {
        self.click_fails.insert(selector.to_string());
        self
    }

    pub fn force_fails(mut self, selector: &str) -> Self {
        self.force_fails.insert(selector.to_string());
        self
    }

    pub fn goto_fails(mut self) -> Self {
        self.goto_fails = true;
        self
    }

    pub fn fill_fails(mut self) -> Self {
        self.fill_fails = true;
        self
    }

    pub fn enumerate_fails_on(mut self, tick: usize) -> Self {
        self.enumerate_fails_on.insert(tick);
        self
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.get()
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.borrow().clone()
    }

    /// Recorded actions starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.actions
            .borrow()
            .iter()
            .filter(|a| a.starts_with(prefix))
            .count()
    }

    fn record(&self, action: String) {
        self.actions.borrow_mut().push(action);
    }
}

#[async_trait(?Send)]
impl View for FakeView {
    async fn goto(&self, url: &str) -> Result<()> {
        self.record(format!("goto {}", url));
        if self.goto_fails {
            return Err(Error::ActionFailed("net::ERR_CONNECTION_RESET".into()));
        }
        Ok(())
    }

    async fn rendered_posts(&self, _feed: &FeedConfig) -> Result<Vec<RenderedPost>> {
        let tick = self.scrolls.get();
        if self.enumerate_fails_on.contains(&tick) {
            return Err(Error::ActionFailed("execution context destroyed".into()));
        }
        let frame = self
            .frames
            .get(tick)
            .or_else(|| self.frames.last())
            .cloned()
            .unwrap_or_default();
        Ok(frame)
    }

    async fn wait_visible(&self, selector: &str, _timeout_ms: u64) -> Result<bool> {
        self.record(format!("wait {}", selector));
        Ok(self.visible.contains(selector))
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.visible.contains(selector))
    }

    async fn click(&self, selector: &str, _timeout_ms: u64) -> Result<()> {
        self.record(format!("click {}", selector));
        if !self.visible.contains(selector) {
            return Err(Error::ActionFailed(format!("{} not found", selector)));
        }
        if self.click_fails.contains(selector) {
            return Err(Error::Timeout(format!("{} intercepted", selector)));
        }
        Ok(())
    }

    async fn force_click(&self, selector: &str) -> Result<()> {
        self.record(format!("force {}", selector));
        if !self.visible.contains(selector) || self.force_fails.contains(selector) {
            return Err(Error::ActionFailed(format!("{} not clickable", selector)));
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.record(format!("fill {} {}", selector, text));
        if self.fill_fails {
            return Err(Error::ActionFailed("element is not editable".into()));
        }
        Ok(())
    }

    async fn press(&self, selector: &str, key: &str) -> Result<()> {
        self.record(format!("press {} {}", selector, key));
        Ok(())
    }

    async fn scroll_by(&self, pixels: i64) -> Result<()> {
        self.scrolls.set(self.scrolls.get() + 1);
        self.record(format!("scroll {}", pixels));
        Ok(())
    }

    async fn pause(&self, ms: u64) {
        self.record(format!("pause {}", ms));
    }
}

/// Activity log kept in memory.
#[derive(Default)]
pub struct MemoryLog {
    entries: RefCell<Vec<LogEntry>>,
    fails: bool,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn replies(&self) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.reply.is_some())
            .collect()
    }
}

#[async_trait(?Send)]
impl ActivityLog for MemoryLog {
    async fn append(&self, entry: LogEntry) -> Result<()> {
        if self.fails {
            return Err(Error::Io(std::io::Error::other("disk full")));
        }
        self.entries.borrow_mut().push(entry);
        Ok(())
    }
}

/// Reply generator with a fixed answer.
pub struct CannedReplies {
    answer: Option<String>,
    seen: RefCell<Vec<String>>,
}

impl CannedReplies {
    pub fn ok(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ReplyGenerator for CannedReplies {
    async fn generate(&self, source_text: &str) -> Result<String> {
        self.seen.borrow_mut().push(source_text.to_string());
        self.answer
            .clone()
            .ok_or_else(|| Error::Service("429 Too Many Requests: rate limited".into()))
    }
}

/// A rendered post whose counters are (replies, retweets, likes, views).
pub fn rendered(body: &str, counts: [u64; 4], href: Option<&str>) -> RenderedPost {
    RenderedPost {
        text_runs: vec![
            body.to_string(),
            format!("{} {} {} {}", counts[0], counts[1], counts[2], counts[3]),
        ],
        href: href.map(String::from),
    }
}
