//! Utility functions for text escaping, truncation and Telegram API retries.

use anyhow::Result;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use tracing::warn;

/// Leading articles ignored when ordering titles.
const LEADING_ARTICLES: &[&str] = &["the ", "a ", "an "];

/// Escapes text for Telegram's HTML parse mode.
///
/// # Examples
///
/// ```
/// use radarr_bot::utils::escape_html;
/// assert_eq!(escape_html("Tom & Jerry <3"), "Tom &amp; Jerry &lt;3");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Builds an HTML anchor with an escaped label and attribute-safe href.
#[must_use]
pub fn html_link(href: &str, label: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        html_escape::encode_double_quoted_attribute(href),
        escape_html(label)
    )
}

/// Key used to order movie titles: lowercase with a leading article dropped.
///
/// # Examples
///
/// ```
/// use radarr_bot::utils::title_sort_key;
/// assert_eq!(title_sort_key("The Matrix"), "matrix");
/// assert_eq!(title_sort_key("An American Werewolf in London"), "american werewolf in london");
/// assert_eq!(title_sort_key("Theodora"), "theodora");
/// ```
#[must_use]
pub fn title_sort_key(title: &str) -> String {
    let lower = title.trim().to_lowercase();
    for article in LEADING_ARTICLES {
        if let Some(rest) = lower.strip_prefix(article) {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    lower
}

/// Truncate a string to a maximum number of characters (not bytes).
///
/// # Examples
///
/// ```
/// use radarr_bot::utils::truncate_str;
/// let s = "Привет, мир!";
/// assert_eq!(truncate_str(s, 6), "Привет");
/// ```
pub fn truncate_str(s: impl AsRef<str>, max_chars: usize) -> String {
    let s = s.as_ref();
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    s.char_indices()
        .nth(max_chars)
        .map_or_else(|| s.to_string(), |(pos, _)| s[..pos].to_string())
}

/// Retry a Telegram API operation with exponential backoff.
///
/// The retry strategy uses exponential backoff with jitter:
/// - Initial delay: 500ms
/// - Max delay: 4s
/// - Max attempts: 3 (see constants in `config.rs`)
///
/// # Errors
///
/// Returns the last error if all attempts fail.
pub async fn retry_telegram_operation<F, Fut, T>(operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    use crate::config::{
        TELEGRAM_API_INITIAL_BACKOFF_MS, TELEGRAM_API_MAX_BACKOFF_MS, TELEGRAM_API_MAX_RETRIES,
    };

    let retry_strategy = ExponentialBackoff::from_millis(TELEGRAM_API_INITIAL_BACKOFF_MS)
        .max_delay(Duration::from_millis(TELEGRAM_API_MAX_BACKOFF_MS))
        .map(jitter)
        .take(TELEGRAM_API_MAX_RETRIES);

    Retry::spawn(retry_strategy, operation).await.map_err(|e| {
        warn!(
            "Telegram API operation failed after {} attempts: {}",
            TELEGRAM_API_MAX_RETRIES, e
        );
        e
    })
}
