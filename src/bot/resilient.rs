//! Resilient messaging utilities with automatic retry for Telegram API operations.
//!
//! Every request goes through [`crate::utils::retry_telegram_operation`], so
//! transient network failures are retried with exponential backoff and jitter.
//! Screens are always sent in HTML parse mode.

use crate::bot::views::Screen;
use crate::utils::truncate_str;
use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, LinkPreviewOptions, Message, MessageId, ParseMode};
use tracing::debug;

/// Telegram's limit is 4096; leave room for the truncation marker.
const MAX_TEXT_CHARS: usize = 4000;

const ERROR_NOT_MODIFIED: &str = "message is not modified";

fn link_preview(enabled: bool) -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: !enabled,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

fn fit_text(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_CHARS {
        format!("{}...", truncate_str(text, MAX_TEXT_CHARS))
    } else {
        text.to_string()
    }
}

/// Send a screen as a new message with automatic retry on network failures.
///
/// # Errors
///
/// Returns the last error after all retries are exhausted.
pub async fn send_screen_resilient(
    bot: &Bot,
    chat_id: ChatId,
    screen: &Screen,
) -> Result<Message> {
    let text = fit_text(&screen.text);
    crate::utils::retry_telegram_operation(|| async {
        let mut req = bot
            .send_message(chat_id, text.clone())
            .parse_mode(ParseMode::Html)
            .link_preview_options(link_preview(screen.link_preview));
        if let Some(keyboard) = &screen.keyboard {
            req = req.reply_markup(keyboard.clone());
        }
        req.await
            .map_err(|e| anyhow::anyhow!("Telegram send error: {e}"))
    })
    .await
}

/// Replace text and keyboard of an existing message with automatic retry.
///
/// Telegram rejects an edit that changes nothing; that case counts as
/// success since the message already shows the screen.
///
/// # Errors
///
/// Returns the last error after all retries are exhausted.
pub async fn edit_screen_resilient(
    bot: &Bot,
    chat_id: ChatId,
    msg_id: MessageId,
    screen: &Screen,
) -> Result<()> {
    let text = fit_text(&screen.text);
    crate::utils::retry_telegram_operation(|| async {
        let mut req = bot
            .edit_message_text(chat_id, msg_id, text.clone())
            .parse_mode(ParseMode::Html)
            .link_preview_options(link_preview(screen.link_preview));
        if let Some(keyboard) = &screen.keyboard {
            req = req.reply_markup(keyboard.clone());
        }
        match req.await {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains(ERROR_NOT_MODIFIED) => {
                debug!("Message update skipped: {e}");
                Ok(())
            }
            Err(e) => Err(anyhow::anyhow!("Telegram edit error: {e}")),
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_text_is_truncated() {
        let text = "x".repeat(MAX_TEXT_CHARS + 10);
        let fitted = fit_text(&text);
        assert_eq!(fitted.chars().count(), MAX_TEXT_CHARS + 3);
        assert!(fitted.ends_with("..."));
    }

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(fit_text("Deleted movies:\n- Heat"), "Deleted movies:\n- Heat");
    }

    #[test]
    fn test_link_preview_toggle() {
        assert!(link_preview(false).is_disabled);
        assert!(!link_preview(true).is_disabled);
    }
}
