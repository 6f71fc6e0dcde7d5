//! Flow dispatcher
//!
//! Routes commands and button clicks to the owning flow and applies the
//! resulting [`Step`] to the session store and the chat. It knows nothing
//! about Telegram beyond the [`ChatTransport`] seam.

use crate::bot::callback::{ActiveCommand, CallbackToken};
use crate::bot::flows::{self, Next, Reply, Step};
use crate::bot::handlers::Command;
use crate::bot::session_store::SessionStore;
use crate::bot::state::{MessageAnchor, Session};
use crate::bot::transport::ChatTransport;
use crate::bot::views::{
    self, Screen, ACCESS_DENIED, COMMANDS_CLEARED, HELP, UNKNOWN_CALLBACK, UNKNOWN_COMMAND,
};
use crate::config::Settings;
use crate::radarr::LibraryBackend;
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point for every user interaction
pub struct FlowDispatcher {
    store: SessionStore,
    backend: Arc<dyn LibraryBackend>,
    transport: Arc<dyn ChatTransport>,
    page_size: usize,
    allowed_users: HashSet<i64>,
}

impl FlowDispatcher {
    /// Dispatcher configured from settings.
    #[must_use]
    pub fn new(
        settings: &Settings,
        backend: Arc<dyn LibraryBackend>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self::with_limits(
            backend,
            transport,
            settings.max_items,
            settings.allowed_users(),
        )
    }

    /// Dispatcher with an explicit page size and allow-list.
    #[must_use]
    pub fn with_limits(
        backend: Arc<dyn LibraryBackend>,
        transport: Arc<dyn ChatTransport>,
        page_size: usize,
        allowed_users: HashSet<i64>,
    ) -> Self {
        Self {
            store: SessionStore::new(),
            backend,
            transport,
            page_size: page_size.max(1),
            allowed_users,
        }
    }

    /// Sessions currently held, for inspection.
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.store
    }

    fn is_allowed(&self, user_id: i64) -> bool {
        self.allowed_users.contains(&user_id)
    }

    async fn deny(&self, user_id: i64, chat_id: i64) -> Result<()> {
        info!(user_id = user_id, "⛔️ Unauthorized access, sending denial message");
        self.transport
            .send(chat_id, Screen::notice(ACCESS_DENIED))
            .await?;
        Ok(())
    }

    /// Handle a recognised command.
    ///
    /// # Errors
    ///
    /// Returns an error if the chat transport fails.
    pub async fn on_command(&self, user_id: i64, chat_id: i64, command: Command) -> Result<()> {
        if !self.is_allowed(user_id) {
            return self.deny(user_id, chat_id).await;
        }
        info!(user_id = user_id, command = ?command, "Command received");

        match command {
            Command::Start | Command::Help => {
                self.transport.send(chat_id, Screen::notice(HELP)).await?;
            }
            Command::Clear => {
                self.store.clear(user_id).await;
                self.transport
                    .send(chat_id, Screen::notice(COMMANDS_CLEARED))
                    .await?;
            }
            Command::Delete(query) => {
                self.start_flow(user_id, chat_id, ActiveCommand::Delete, &query)
                    .await?;
            }
            Command::Add(query) => {
                self.start_flow(user_id, chat_id, ActiveCommand::Add, &query)
                    .await?;
            }
        }
        Ok(())
    }

    /// Handle a slash command nobody recognises.
    ///
    /// # Errors
    ///
    /// Returns an error if the chat transport fails.
    pub async fn on_unknown_command(&self, user_id: i64, chat_id: i64) -> Result<()> {
        if !self.is_allowed(user_id) {
            return self.deny(user_id, chat_id).await;
        }
        self.transport
            .send(chat_id, Screen::notice(UNKNOWN_COMMAND))
            .await?;
        Ok(())
    }

    /// Handle a button click carrying `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chat transport fails.
    pub async fn on_callback(&self, user_id: i64, chat_id: i64, data: &str) -> Result<()> {
        let session = self.store.get(user_id).await;
        let token = CallbackToken::parse(data);

        let (Some(session), Some(token)) = (session, token) else {
            debug!(user_id = user_id, data = data, "Callback without matching session");
            return self.reset(user_id, chat_id).await;
        };
        if token.command != session.command() {
            debug!(
                user_id = user_id,
                data = data,
                active = ?session.command(),
                "Callback for another command"
            );
            return self.reset(user_id, chat_id).await;
        }

        let anchor = session.anchor();
        let backend = self.backend.as_ref();
        let step = match session {
            Session::Delete(s) => {
                flows::delete::on_callback(s, token.action, backend, self.page_size).await
            }
            Session::Add(s) => {
                flows::add::on_callback(s, token.action, backend, self.page_size).await
            }
        };
        self.apply(user_id, chat_id, anchor, step).await
    }

    /// Drop any previous session, post the placeholder and run the first
    /// transition of `command`.
    async fn start_flow(
        &self,
        user_id: i64,
        chat_id: i64,
        command: ActiveCommand,
        query: &str,
    ) -> Result<()> {
        self.store.clear(user_id).await;

        let placeholder = match command {
            ActiveCommand::Delete => views::delete::PLEASE_WAIT,
            ActiveCommand::Add => views::add::PLEASE_WAIT,
        };
        let anchor = self
            .transport
            .send(chat_id, Screen::notice(placeholder))
            .await?;

        let backend = self.backend.as_ref();
        let step = match command {
            ActiveCommand::Delete => {
                flows::delete::start(anchor, query, backend, self.page_size).await
            }
            ActiveCommand::Add => flows::add::start(anchor, query, backend, self.page_size).await,
        };
        self.apply(user_id, chat_id, anchor, step).await
    }

    async fn apply(
        &self,
        user_id: i64,
        chat_id: i64,
        anchor: MessageAnchor,
        step: Step,
    ) -> Result<()> {
        match step.next {
            Next::Store(session) => self.store.replace(user_id, session).await,
            Next::Clear => {
                self.store.clear(user_id).await;
            }
            Next::Unchanged => {}
            Next::Reset => return self.reset(user_id, chat_id).await,
        }

        match step.reply {
            Reply::Edit(screen) => self.transport.edit(anchor, screen).await?,
            Reply::Send(screen) => {
                self.transport.send(chat_id, screen).await?;
            }
            Reply::Nothing => {}
        }
        Ok(())
    }

    async fn reset(&self, user_id: i64, chat_id: i64) -> Result<()> {
        self.store.clear(user_id).await;
        self.transport
            .send(chat_id, Screen::notice(UNKNOWN_CALLBACK))
            .await?;
        Ok(())
    }
}
