use crate::config::ReplyConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Turns a post's text into reply text.
#[async_trait(?Send)]
pub trait ReplyGenerator {
    async fn generate(&self, source_text: &str) -> Result<String>;
}

/// Chat-completions client (OpenAI or any compatible endpoint).
pub struct OpenAiReplies {
    http: Client,
    config: ReplyConfig,
}

impl OpenAiReplies {
    /// Build a client whose requests are bounded by `config.timeout_ms`.
    pub fn new(config: ReplyConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Service(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    fn request_body(&self, source_text: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": self.config.prompt.replace("{post}", source_text),
            }],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(format!(
                "reply service did not answer within {}ms",
                self.config.timeout_ms
            ))
        } else {
            Error::Http(e)
        }
    }
}

#[async_trait(?Send)]
impl ReplyGenerator for OpenAiReplies {
    async fn generate(&self, source_text: &str) -> Result<String> {
        if self.config.api_key.is_empty() {
            return Err(Error::Service("no API key configured (reply.api_key)".into()));
        }

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        debug!("requesting reply from {} ({})", url, self.config.model);

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&self.request_body(source_text))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let raw = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(Error::Service(format!("{}: {}", status, error_message(&raw))));
        }

        let body: Value = serde_json::from_str(&raw)
            .map_err(|e| Error::Service(format!("unreadable response body: {}", e)))?;
        reply_text(&body)
    }
}

/// Best description of a failed request: the API's own message if the body
/// is a JSON error, else the start of the raw body.
fn error_message(raw: &str) -> String {
    let from_json = serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|b| b["error"]["message"].as_str().map(String::from));
    match from_json {
        Some(m) => m,
        None if raw.trim().is_empty() => "no error message".into(),
        None => raw.trim().chars().take(200).collect(),
    }
}

/// Pull the first choice's message out of a chat-completions response.
fn reply_text(body: &Value) -> Result<String> {
    let text = body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .unwrap_or_default();
    if text.is_empty() {
        return Err(Error::Service("response contained no reply text".into()));
    }
    Ok(text.to_string())
}
