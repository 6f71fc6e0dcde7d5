//! Shared test fixtures.

use crate::bot::state::MessageAnchor;
use crate::bot::transport::ChatTransport;
use crate::bot::views::Screen;
use crate::radarr::Movie;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Imported movie with library id `id`; the catalog id is derived from it.
pub fn movie(id: i64, title: &str) -> Movie {
    Movie {
        id: Some(id),
        tmdb_id: id + 100,
        title: title.to_string(),
        year: 2000,
        imdb_id: Some(format!("tt{id:07}")),
        ..Movie::default()
    }
}

/// `count` imported movies titled `Movie 01`, `Movie 02`, ...
pub fn library(count: i64) -> Vec<Movie> {
    (1..=count)
        .map(|i| movie(i, &format!("Movie {i:02}")))
        .collect()
}

/// One outgoing call seen by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    /// New message in a chat
    Message(i64, Screen),
    /// Repaint of an existing message
    Edit(MessageAnchor, Screen),
}

impl Sent {
    /// Text of the screen, whatever the call
    pub fn text(&self) -> &str {
        match self {
            Self::Message(_, screen) | Self::Edit(_, screen) => &screen.text,
        }
    }
}

/// Transport double that records every call and hands out message ids
/// starting at 100.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    /// Every call so far, oldest first
    pub async fn calls(&self) -> Vec<Sent> {
        self.calls.lock().await.clone()
    }

    /// Most recent call
    pub async fn last(&self) -> Option<Sent> {
        self.calls.lock().await.last().cloned()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, chat_id: i64, screen: Screen) -> Result<MessageAnchor> {
        let mut calls = self.calls.lock().await;
        let sent = calls
            .iter()
            .filter(|c| matches!(c, Sent::Message(..)))
            .count();
        calls.push(Sent::Message(chat_id, screen));
        Ok(MessageAnchor {
            chat_id,
            message_id: 100 + i32::try_from(sent).unwrap_or(i32::MAX - 100),
        })
    }

    async fn edit(&self, anchor: MessageAnchor, screen: Screen) -> Result<()> {
        self.calls.lock().await.push(Sent::Edit(anchor, screen));
        Ok(())
    }
}
