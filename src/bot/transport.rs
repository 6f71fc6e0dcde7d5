//! Chat transport
//!
//! The dispatcher only needs two operations from the messenger: post a new
//! message and repaint an existing one. Keeping them behind a trait lets the
//! flows run against a recording double in tests.

use crate::bot::resilient::{edit_screen_resilient, send_screen_resilient};
use crate::bot::state::MessageAnchor;
use crate::bot::views::Screen;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId};

/// Outgoing side of the chat
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Post `screen` as a new message and return where it landed.
    async fn send(&self, chat_id: i64, screen: Screen) -> Result<MessageAnchor>;

    /// Repaint the message at `anchor` with `screen`.
    async fn edit(&self, anchor: MessageAnchor, screen: Screen) -> Result<()>;
}

/// Telegram Bot API transport.
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Wrap a bot handle.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send(&self, chat_id: i64, screen: Screen) -> Result<MessageAnchor> {
        let msg = send_screen_resilient(&self.bot, ChatId(chat_id), &screen).await?;
        Ok(MessageAnchor {
            chat_id,
            message_id: msg.id.0,
        })
    }

    async fn edit(&self, anchor: MessageAnchor, screen: Screen) -> Result<()> {
        edit_screen_resilient(
            &self.bot,
            ChatId(anchor.chat_id),
            MessageId(anchor.message_id),
            &screen,
        )
        .await
    }
}
