//! Reshare + reply sequence against the selected post.
//!
//! Each step reports a [`StepOutcome`] instead of raising. A control that is
//! found but does not respond gets exactly one fallback (a forced click, or
//! the alternate submit control); if that fails too the step is `Failed` and
//! the sequence moves on.

mod outcome;

pub use outcome::{EngageReport, StepOutcome, Via};

use crate::activity::ActivityLog;
use crate::config::EngageConfig;
use crate::post::Post;
use crate::reply::ReplyGenerator;
use crate::view::View;
use feedpilot_log::LogEntry;
use tracing::{debug, info, warn};

/// How a control ended up activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Click {
    Normal,
    Forced,
}

/// Drives the engage steps for one post over a borrowed view.
pub struct Orchestrator<'a, V, R, L> {
    view: &'a V,
    replies: &'a R,
    log: &'a L,
    config: &'a EngageConfig,
    handle: &'a str,
}

impl<'a, V, R, L> Orchestrator<'a, V, R, L>
where
    V: View,
    R: ReplyGenerator,
    L: ActivityLog,
{
    pub fn new(
        view: &'a V,
        replies: &'a R,
        log: &'a L,
        config: &'a EngageConfig,
        handle: &'a str,
    ) -> Self {
        Self {
            view,
            replies,
            log,
            config,
            handle,
        }
    }

    /// Run every step against `post`. Never fails; see the report.
    pub async fn engage(&self, post: &Post) -> EngageReport {
        let Some(url) = post.url.as_deref() else {
            warn!("selected post has no permalink, nothing to engage with");
            return EngageReport::not_navigable();
        };

        let mut report = EngageReport::new();

        report.navigate = match self.view.goto(url).await {
            Ok(()) => {
                info!("opened post: {}", url);
                StepOutcome::Done(Via::Primary)
            }
            Err(e) => {
                warn!("navigation to {} failed: {}", url, e);
                StepOutcome::Failed(e.to_string())
            }
        };

        report.reshare = self.reshare().await;
        report.dismiss = self.dismiss_interstitial().await;

        let (compose, reply) = self.compose(post).await;
        report.compose = compose;
        report.reply = reply;

        report.submit = if report.compose.is_done() {
            self.submit().await
        } else {
            StepOutcome::Skipped
        };

        info!(
            "engage finished: reshare {}, reply {}",
            report.reshare, report.submit
        );
        report
    }

    async fn reshare(&self) -> StepOutcome {
        let c = self.config;
        self.view.pause(c.navigate_settle_ms).await;

        if !self.visible(&c.reshare, c.reshare_timeout_ms).await {
            debug!("reshare control absent");
            return StepOutcome::Absent;
        }
        let first = match self.activate(&c.reshare).await {
            Ok(click) => click,
            Err(msg) => return StepOutcome::Failed(msg),
        };

        if !self.visible(&c.reshare_confirm, c.reshare_timeout_ms).await {
            debug!("reshare confirmation absent");
            return StepOutcome::Absent;
        }
        match self.activate(&c.reshare_confirm).await {
            Ok(second) => {
                info!("reshare done");
                if first == Click::Forced || second == Click::Forced {
                    StepOutcome::Done(Via::PrimaryForced)
                } else {
                    StepOutcome::Done(Via::Primary)
                }
            }
            Err(msg) => StepOutcome::Failed(msg),
        }
    }

    async fn dismiss_interstitial(&self) -> StepOutcome {
        let c = self.config;
        if !self
            .visible(&c.interstitial_close, c.interstitial_timeout_ms)
            .await
        {
            return StepOutcome::Absent;
        }
        match self.activate(&c.interstitial_close).await {
            Ok(click) => {
                info!("interstitial closed");
                StepOutcome::Done(Via::primary(click == Click::Forced))
            }
            Err(msg) => StepOutcome::Failed(msg),
        }
    }

    /// Focus the reply input, generate and fill the reply, record it.
    async fn compose(&self, post: &Post) -> (StepOutcome, Option<String>) {
        let c = self.config;
        if !self.visible(&c.reply_input, c.reply_timeout_ms).await {
            warn!("reply input not found");
            return (StepOutcome::Failed("reply input not found".into()), None);
        }
        let click = match self.activate(&c.reply_input).await {
            Ok(click) => click,
            Err(msg) => return (StepOutcome::Failed(msg), None),
        };

        let text = match self.replies.generate(&post.content).await {
            Ok(t) => t,
            Err(e) => {
                warn!("reply generation failed: {}", e);
                return (StepOutcome::Failed(e.to_string()), None);
            }
        };
        info!("generated reply: {}", text);

        if let Err(e) = self.view.fill(&c.reply_input, &text).await {
            warn!("could not fill reply input: {}", e);
            return (StepOutcome::Failed(e.to_string()), Some(text));
        }

        let entry = LogEntry::new(self.handle, post.content.clone())
            .reply(text.clone())
            .engagement(post.likes(), post.retweets())
            .fingerprint(post.fingerprint.clone())
            .url(post.url.clone());
        if let Err(e) = self.log.append(entry).await {
            warn!("reply not recorded in activity log: {}", e);
        }

        // let debounced editor state catch up before submitting
        self.view.pause(c.compose_settle_ms).await;
        (StepOutcome::Done(Via::primary(click == Click::Forced)), Some(text))
    }

    async fn submit(&self) -> StepOutcome {
        let c = self.config;

        for (selector, alternate) in [(&c.submit, false), (&c.submit_alternate, true)] {
            if !self.present(selector).await {
                debug!("submit control {} absent", selector);
                continue;
            }
            return match self.activate(selector).await {
                Ok(click) => {
                    let via = match (alternate, click) {
                        (false, Click::Normal) => Via::Primary,
                        (false, Click::Forced) => Via::PrimaryForced,
                        (true, Click::Normal) => Via::Alternate,
                        (true, Click::Forced) => Via::AlternateForced,
                    };
                    info!("reply submitted ({})", via);
                    StepOutcome::Done(via)
                }
                Err(msg) => StepOutcome::Failed(msg),
            };
        }

        warn!("no submit control found, pressing {}", c.submit_key);
        match self.view.press(&c.reply_input, &c.submit_key).await {
            Ok(()) => StepOutcome::Done(Via::KeyPress),
            Err(e) => StepOutcome::Failed(format!("{} key press failed: {}", c.submit_key, e)),
        }
    }

    /// Normal click, then one forced click if that fails.
    async fn activate(&self, selector: &str) -> Result<Click, String> {
        let first = match self.view.click(selector, self.config.click_timeout_ms).await {
            Ok(()) => return Ok(Click::Normal),
            Err(e) => e,
        };
        warn!("click on {} failed ({}), forcing", selector, first);
        match self.view.force_click(selector).await {
            Ok(()) => Ok(Click::Forced),
            Err(e) => Err(format!(
                "{}: click failed ({}), forced click failed ({})",
                selector, first, e
            )),
        }
    }

    async fn visible(&self, selector: &str, timeout_ms: u64) -> bool {
        self.view
            .wait_visible(selector, timeout_ms)
            .await
            .unwrap_or_else(|e| {
                debug!("wait for {} errored: {}", selector, e);
                false
            })
    }

    async fn present(&self, selector: &str) -> bool {
        self.view.exists(selector).await.unwrap_or_else(|e| {
            debug!("lookup of {} errored: {}", selector, e);
            false
        })
    }
}
