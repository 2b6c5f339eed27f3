pub mod login;
mod page;

pub use page::PageView;

use crate::activity::ActivityLog;
use crate::config::{BrowserConfig, Config};
use crate::engage::{EngageReport, Orchestrator};
use crate::feed;
use crate::post::Post;
use crate::reply::{OpenAiReplies, ReplyGenerator};
use crate::select::select;
use crate::view::View;
use crate::Result;
use eoka::{Browser, Page};
use feedpilot_log::{AsyncJsonlStore, LogEntry};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What one run saw and did.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Unique posts collected from the feed.
    pub posts_collected: usize,
    /// Collected posts acknowledged by the activity log.
    pub posts_logged: usize,
    /// Post chosen for engagement.
    pub selected: Option<Post>,
    /// Step outcomes, if the engage phase ran.
    pub engage: Option<EngageReport>,
    /// Degraded steps that did not stop the run.
    pub warnings: Vec<String>,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Owns the browser session for one run.
pub struct Runner {
    browser: Browser,
    page: Page,
}

impl Runner {
    /// Launch a browser with the given config.
    pub async fn new(config: &BrowserConfig) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless: config.headless,
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            viewport_width: config.viewport.as_ref().map(|v| v.width).unwrap_or(1280),
            viewport_height: config.viewport.as_ref().map(|v| v.height).unwrap_or(720),
            ..Default::default()
        };

        debug!(
            "Launching browser (headless: {}, proxy: {:?})",
            config.headless, config.proxy
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self { browser, page })
    }

    /// Sign in, collect, log, select, then reshare and reply.
    pub async fn run(&mut self, config: &Config) -> Result<RunReport> {
        self.run_inner(config, true).await
    }

    /// Everything up to and including logging the collected posts.
    pub async fn run_collect_only(&mut self, config: &Config) -> Result<RunReport> {
        self.run_inner(config, false).await
    }

    async fn run_inner(&mut self, config: &Config, engage: bool) -> Result<RunReport> {
        let log = AsyncJsonlStore::open(&config.log.path).await?;
        info!("Activity log: {}", config.log.path);
        let replies = OpenAiReplies::new(config.reply.clone())?;
        let view = PageView::new(&self.page);
        Ok(run_pipeline(&view, config, &replies, &log, engage).await)
    }

    /// Close the browser.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

/// The whole run over any [`View`]. Never fails; problems become warnings
/// and step outcomes in the report.
pub async fn run_pipeline<V, R, L>(
    view: &V,
    config: &Config,
    replies: &R,
    log: &L,
    engage: bool,
) -> RunReport
where
    V: View,
    R: ReplyGenerator,
    L: ActivityLog,
{
    let start = Instant::now();
    let mut warnings = Vec::new();

    if let Some(ref login) = config.login {
        warnings.extend(login::sign_in(view, login).await);
    }

    if let Some(ref url) = config.feed.url {
        info!("Navigating to feed: {}", url);
        if let Err(e) = view.goto(url).await {
            warn!("could not open feed {}: {}", url, e);
            warnings.push(format!("could not open feed {}: {}", url, e));
        }
    }

    let ready = view
        .wait_visible(&config.feed.post_selector, config.feed.ready_timeout_ms)
        .await
        .unwrap_or(false);
    if ready {
        info!("feed rendered");
    } else {
        warn!(
            "no post rendered within {}ms, collecting anyway",
            config.feed.ready_timeout_ms
        );
        warnings.push("feed did not render before timeout".to_string());
    }

    let posts = feed::collect(view, &config.feed).await;

    let mut posts_logged = 0;
    for post in &posts {
        let entry = LogEntry::new(config.log.handle.clone(), post.content.clone())
            .engagement(post.likes(), post.retweets())
            .fingerprint(post.fingerprint.clone())
            .url(post.url.clone());
        match log.append(entry).await {
            Ok(()) => posts_logged += 1,
            Err(e) => warn!("post not recorded in activity log: {}", e),
        }
    }
    if posts_logged < posts.len() {
        warnings.push(format!(
            "{} of {} posts not recorded in activity log",
            posts.len() - posts_logged,
            posts.len()
        ));
    }

    let selected = select(&posts).cloned();
    let engage_report = match (&selected, engage) {
        (Some(post), true) => {
            info!(
                "best post ({} likes, {} retweets): {:?}",
                post.likes(),
                post.retweets(),
                post.url
            );
            let orchestrator =
                Orchestrator::new(view, replies, log, &config.engage, &config.log.handle);
            Some(orchestrator.engage(post).await)
        }
        (None, _) => {
            warn!("no posts collected, nothing to engage with");
            None
        }
        (Some(_), false) => None,
    };

    if let Some(ref r) = engage_report {
        for (step, outcome) in [("compose", &r.compose), ("submit", &r.submit)] {
            if outcome.is_failed() {
                warnings.push(format!("{}: {}", step, outcome));
            }
        }
    }

    RunReport {
        posts_collected: posts.len(),
        posts_logged,
        selected,
        engage: engage_report,
        warnings,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}
