//! Telegram update handlers
//!
//! Thin adapters from teloxide updates to [`FlowDispatcher`] calls.

use crate::bot::dispatcher::FlowDispatcher;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use teloxide::utils::command::BotCommands;
use tracing::error;

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Greeting with the command overview
    #[command(description = "Show the available commands.")]
    Start,
    /// Command overview
    #[command(description = "Show the available commands.")]
    Help,
    /// Search the catalog and add a movie
    #[command(description = "Search for a movie and add it.")]
    Add(String),
    /// Pick library movies and delete them
    #[command(description = "Delete movies, optionally filtered by title.")]
    Delete(String),
    /// Abort the active command
    #[command(description = "Abort the current command.")]
    Clear,
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
#[must_use]
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Recognised slash command.
///
/// # Errors
///
/// Never fails; dispatcher errors are logged.
pub async fn handle_command(
    msg: Message,
    cmd: Command,
    dispatcher: Arc<FlowDispatcher>,
) -> Result<(), teloxide::RequestError> {
    let user_id = get_user_id_safe(&msg);
    if let Err(e) = dispatcher.on_command(user_id, msg.chat.id.0, cmd).await {
        error!("Command error: {}", e);
    }
    respond(())
}

/// Text starting with `/` that is not a known command.
///
/// # Errors
///
/// Never fails; dispatcher errors are logged.
pub async fn handle_unknown_command(
    msg: Message,
    dispatcher: Arc<FlowDispatcher>,
) -> Result<(), teloxide::RequestError> {
    let user_id = get_user_id_safe(&msg);
    if let Err(e) = dispatcher.on_unknown_command(user_id, msg.chat.id.0).await {
        error!("Unknown command handler error: {}", e);
    }
    respond(())
}

/// Inline keyboard click.
///
/// The query is answered first so the client stops its spinner even if
/// Radarr is slow.
///
/// # Errors
///
/// Never fails; dispatcher errors are logged.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dispatcher: Arc<FlowDispatcher>,
) -> Result<(), teloxide::RequestError> {
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let user_id = q.from.id.0.cast_signed();
    let chat_id = q
        .message
        .as_ref()
        .map_or(user_id, |m| m.chat().id.0);
    let data = q.data.as_deref().unwrap_or_default();

    if let Err(e) = dispatcher.on_callback(user_id, chat_id, data).await {
        error!("Callback handler error: {}", e);
    }
    respond(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_with_and_without_query() {
        assert_eq!(
            Command::parse("/delete the matrix", "radarr_bot").ok(),
            Some(Command::Delete("the matrix".to_string()))
        );
        assert_eq!(
            Command::parse("/add Heat", "radarr_bot").ok(),
            Some(Command::Add("Heat".to_string()))
        );
        assert_eq!(
            Command::parse("/clear", "radarr_bot").ok(),
            Some(Command::Clear)
        );
    }

    #[test]
    fn test_unknown_command_does_not_parse() {
        assert!(Command::parse("/movies", "radarr_bot").is_err());
    }
}
