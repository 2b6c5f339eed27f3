//! # feedpilot
//!
//! Single-session feed agent. Scroll a timeline, collect a bounded sample of
//! unique posts with their engagement counts, pick the most engaging one, then
//! reshare it and post a generated reply.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use feedpilot::{Config, Runner};
//!
//! # #[tokio::main]
//! # async fn main() -> feedpilot::Result<()> {
//! let config = Config::load("configs/x-home.yaml")?;
//! let mut runner = Runner::new(&config.browser).await?;
//! let report = runner.run(&config).await;
//! runner.close().await?;
//! println!("Collected: {}", report?.posts_collected);
//! # Ok(())
//! # }
//! ```
//!
//! The collector and the orchestrator only talk to the page through [`View`],
//! so both can be driven by a scripted fake in tests.

mod activity;
mod config;
pub mod engage;
pub mod feed;
pub mod metrics;
mod post;
mod reply;
mod runner;
mod select;
mod view;

pub use activity::ActivityLog;
pub use config::{
    BrowserConfig, Config, EngageConfig, FeedConfig, LogConfig, LoginConfig, ParamDef, Params,
    ReplyConfig,
};
pub use engage::{EngageReport, Orchestrator, StepOutcome, Via};
pub use feed::collect;
pub use feedpilot_log::LogEntry;
pub use metrics::{extract_metrics, parse_count, Engagement};
pub use post::{fingerprint, normalize, Post};
pub use reply::{OpenAiReplies, ReplyGenerator};
pub use runner::login::sign_in;
pub use runner::{run_pipeline, PageView, RunReport, Runner};
pub use select::select;
pub use view::{RenderedPost, View};

/// Result type for feedpilot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("action failed: {0}")]
    ActionFailed(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("reply service error: {0}")]
    Service(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("activity log error: {0}")]
    Log(#[from] feedpilot_log::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
name: "Home"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.name, "Home");
        assert!(config.login.is_none());
        assert!(!config.browser.headless);
        assert_eq!(config.feed.target, 20);
        assert_eq!(config.feed.max_attempts, 20);
        assert_eq!(config.feed.post_selector, r#"article[role="article"]"#);
        assert_eq!(config.engage.submit, r#"[data-testid="tweetButton"]"#);
        assert_eq!(config.engage.compose_settle_ms, 10000);
        assert_eq!(config.reply.model, "gpt-3.5-turbo");
        assert_eq!(config.reply.timeout_ms, 30000);
        assert_eq!(config.log.handle, "(unknown)");
    }

    #[test]
    fn test_parse_browser_config() {
        let yaml = r#"
name: "Home"
browser:
  headless: true
  proxy: "http://localhost:8080"
  user_agent: "Custom UA"
  viewport:
    width: 1920
    height: 1080
"#;
        let config = Config::parse(yaml).unwrap();
        assert!(config.browser.headless);
        assert_eq!(config.browser.proxy, Some("http://localhost:8080".into()));
        assert_eq!(config.browser.user_agent, Some("Custom UA".into()));
        let viewport = config.browser.viewport.unwrap();
        assert_eq!(viewport.width, 1920);
        assert_eq!(viewport.height, 1080);
    }

    #[test]
    fn test_parse_login_defaults() {
        let yaml = r#"
name: "Home"
login:
  email: "me@example.com"
  password: "hunter2"
"#;
        let config = Config::parse(yaml).unwrap();
        let login = config.login.unwrap();
        assert_eq!(login.url, "https://x.com/login");
        assert_eq!(login.username_selectors.len(), 4);
        assert_eq!(login.username_selectors[0], r#"input[name="text"]"#);
        assert_eq!(login.password_selector, r#"input[name="password"]"#);
        assert_eq!(login.field_timeout_ms, 3000);
    }

    #[test]
    fn test_parse_feed_overrides() {
        let yaml = r#"
name: "Home"
feed:
  url: "https://x.com/home"
  target: 5
  max_attempts: 8
  scroll_px: 600
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.feed.url.as_deref(), Some("https://x.com/home"));
        assert_eq!(config.feed.target, 5);
        assert_eq!(config.feed.max_attempts, 8);
        assert_eq!(config.feed.scroll_px, 600);
        assert_eq!(config.feed.settle_ms, 1000); // default
    }

    #[test]
    fn test_validation_missing_name() {
        let yaml = r#"
feed:
  target: 5
"#;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_validation_empty_name() {
        let result = Config::parse("name: \"\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_target() {
        let yaml = r#"
name: "Home"
feed:
  target: 0
"#;
        let result = Config::parse(yaml);
        assert!(result.unwrap_err().to_string().contains("feed.target"));
    }

    #[test]
    fn test_validation_zero_attempts() {
        let yaml = r#"
name: "Home"
feed:
  max_attempts: 0
"#;
        let result = Config::parse(yaml);
        assert!(result.unwrap_err().to_string().contains("at least 1"));
    }

    #[test]
    fn test_validation_prompt_without_placeholder() {
        let yaml = r#"
name: "Home"
reply:
  prompt: "Say something nice"
"#;
        let result = Config::parse(yaml);
        assert!(result.unwrap_err().to_string().contains("{post}"));
    }

    #[test]
    fn test_validation_zero_reply_timeout() {
        let yaml = r#"
name: "Home"
reply:
  timeout_ms: 0
"#;
        let result = Config::parse(yaml);
        assert!(result.unwrap_err().to_string().contains("reply.timeout_ms"));
    }

    #[test]
    fn test_validation_empty_username_selectors() {
        let yaml = r#"
name: "Home"
login:
  username_selectors: []
"#;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_params_substitution() {
        let yaml = r##"
name: "Home"
params:
  email:
    required: true
  password:
    required: true
login:
  email: "${email}"
  password: "${password}"
"##;
        let params = Params::new()
            .set("email", "test@example.com")
            .set("password", "secret123");
        let config = Config::parse_with_params(yaml, &params).unwrap();
        let login = config.login.unwrap();
        assert_eq!(login.email, "test@example.com");
        assert_eq!(login.password, "secret123");
    }

    #[test]
    fn test_params_default_value() {
        let yaml = r##"
name: "Home"
params:
  feedpilot_test_handle_unset:
    default: "@someone"
log:
  handle: "${feedpilot_test_handle_unset}"
"##;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.log.handle, "@someone");
    }

    #[test]
    fn test_params_missing_required() {
        let yaml = r##"
name: "Home"
params:
  feedpilot_test_key_unset:
    required: true
reply:
  api_key: "${feedpilot_test_key_unset}"
"##;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("feedpilot_test_key_unset"));
    }

    #[test]
    fn test_load_bundled_config() {
        let config = Config::load("configs/x-home.yaml").unwrap();
        assert_eq!(config.name, "X home timeline");
        assert_eq!(config.feed.target, 20);
        assert!(config.login.is_some());
        assert_eq!(config.reply.timeout_ms, 30000);
    }
}
