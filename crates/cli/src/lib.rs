//! Helpers shared by the `moviehub` binary: simulated typing and terminal rendering.

use catalog::Catalog;
use console::style;
use core_types::config::AppConfig;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use typeahead::{Applied, Navigator, Span, TypeaheadController};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pause between simulated keystrokes; shorter than any sensible debounce.
pub const KEYSTROKE: Duration = Duration::from_millis(40);

/// Feed `text` to the controller one character at a time, then apply events
/// until the list for the final text is in place or nothing arrives within `patience`.
pub async fn type_and_wait<C, N>(
    ctl: &mut TypeaheadController<C, N>,
    text: &str,
    keystroke: Duration,
    patience: Duration,
) -> Vec<Applied>
where
    C: Catalog,
    N: Navigator,
{
    let mut typed = String::new();
    for ch in text.chars() {
        typed.push(ch);
        ctl.on_text_changed(typed.clone());
        sleep(keystroke).await;
    }

    let mut applied = Vec::new();
    if text.trim().is_empty() {
        return applied;
    }
    while let Ok(Some(event)) = timeout(patience, ctl.process_next()).await {
        let settled = matches!(
            event,
            Applied::SuggestionsReplaced { generation, .. } if generation == ctl.generation()
        );
        applied.push(event);
        if settled {
            break;
        }
    }
    applied
}

/// How long to wait for one suggestion round trip under `cfg`.
pub fn patience(cfg: &AppConfig) -> Duration {
    let attempts = u64::from(cfg.catalog.retries) + 1;
    Duration::from_millis(
        cfg.typeahead.debounce_ms + cfg.catalog.request_timeout_ms * attempts + 1_000,
    )
}

/// Title with matched runs emphasised for the terminal.
pub fn emphasise(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| {
            if span.is_match {
                style(span.text.as_str()).bold().yellow().to_string()
            } else {
                span.text.clone()
            }
        })
        .collect()
}

/// Config as TOML with the credential masked.
pub fn redacted_config(cfg: &AppConfig) -> anyhow::Result<String> {
    let mut shown = cfg.clone();
    if shown.catalog.api_key.is_some() {
        shown.catalog.api_key = Some("********".to_string());
    }
    Ok(toml::to_string_pretty(&shown)?)
}
