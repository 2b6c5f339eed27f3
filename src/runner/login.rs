//! Credential sign-in. A missing field is a warning; the run carries on
//! with whatever session state it ends up in.

use crate::config::LoginConfig;
use crate::view::View;
use tracing::{info, warn};

/// Sign in with the configured credentials. Returns a warning if any step
/// could not be completed.
pub async fn sign_in<V: View>(view: &V, login: &LoginConfig) -> Option<String> {
    match attempt(view, login).await {
        Ok(()) => {
            info!("login submitted");
            None
        }
        Err(w) => {
            warn!("login: {}", w);
            Some(format!("login: {}", w))
        }
    }
}

async fn attempt<V: View>(view: &V, login: &LoginConfig) -> Result<(), String> {
    view.goto(&login.url)
        .await
        .map_err(|e| format!("could not open {}: {}", login.url, e))?;
    info!("opened login page: {}", login.url);

    let mut username_field = None;
    for selector in &login.username_selectors {
        if visible(view, selector, login.field_timeout_ms).await {
            username_field = Some(selector.as_str());
            break;
        }
    }
    let username_field = username_field.ok_or("username field not found")?;

    enter(view, username_field, &login.email)
        .await
        .map_err(|e| format!("could not enter username: {}", e))?;
    view.pause(login.step_pause_ms).await;

    if !visible(view, &login.password_selector, login.field_timeout_ms).await {
        return Err("password field not found".into());
    }
    enter(view, &login.password_selector, &login.password)
        .await
        .map_err(|e| format!("could not enter password: {}", e))
}

async fn visible<V: View>(view: &V, selector: &str, timeout_ms: u64) -> bool {
    matches!(view.wait_visible(selector, timeout_ms).await, Ok(true))
}

async fn enter<V: View>(view: &V, selector: &str, value: &str) -> crate::Result<()> {
    view.fill(selector, value).await?;
    view.press(selector, "Enter").await
}
