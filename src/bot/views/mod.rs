//! View layer: message texts and inline keyboards for the command flows.
//!
//! Views only read session snapshots. Rendering the same snapshot twice
//! yields identical screens, which lets the transport treat a repeated edit
//! as a no-op.

/// Screens of the `/add` flow
pub mod add;
/// Screens of the `/delete` flow
pub mod delete;

use crate::bot::callback::{ActiveCommand, CallbackAction, CallbackToken};
use crate::bot::selection::page_count;
use crate::utils::escape_html;
use std::fmt::Write;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// ─────────────────────────────────────────────────────────────────────────────
// Shared texts
// ─────────────────────────────────────────────────────────────────────────────

/// Sent to senders outside the allow-list
pub const ACCESS_DENIED: &str = "Access denied. You are not authorized.";
/// Shown after Cancel or `/clear`
pub const COMMANDS_CLEARED: &str = "All commands have been cleared";
/// Sent when a click matches no live session
pub const UNKNOWN_CALLBACK: &str = "I am not sure what you mean.\nAll commands have been cleared";
/// Lookup returned nothing at all
pub const NO_SEARCH_RESULTS: &str = "No movies found matching your search criteria";
/// Lookup returned more than the keyboard can hold
pub const TOO_MANY_RESULTS: &str =
    "Result size too large, please narrow down your search criteria";
/// Unknown slash command
pub const UNKNOWN_COMMAND: &str = "I don't know that command. Try /help";

/// Command overview for `/start` and `/help`
pub const HELP: &str = "Available commands:\n\
/add <title> - search for a movie and add it to the library\n\
/delete [title] - pick movies from the library and delete them\n\
/clear - abort the current command\n\
/help - show this message";

/// Label of the Cancel button used by every flow
pub const CANCEL_LABEL: &str = "Cancel - clear command";
/// Label of the Back button used by every flow
pub const BACK_LABEL: &str = "\u{1F519}";

/// Characters a movie list may take, leaving room for the header and the
/// overflow line below Telegram's message limit
pub const LIST_TEXT_BUDGET: usize = 3500;

// ─────────────────────────────────────────────────────────────────────────────
// Screen
// ─────────────────────────────────────────────────────────────────────────────

/// Rendered message: HTML text plus an optional inline keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    /// Message body in Telegram HTML
    pub text: String,
    /// Inline keyboard, if any
    pub keyboard: Option<InlineKeyboardMarkup>,
    /// Whether Telegram may show a link preview
    pub link_preview: bool,
}

impl Screen {
    /// Plain text notice without keyboard; the text is escaped.
    #[must_use]
    pub fn notice(text: &str) -> Self {
        Self {
            text: escape_html(text),
            keyboard: None,
            link_preview: false,
        }
    }

    /// Already formatted HTML with a keyboard.
    #[must_use]
    pub fn with_keyboard(html: String, rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            text: html,
            keyboard: Some(InlineKeyboardMarkup::new(rows)),
            link_preview: false,
        }
    }

    /// Every button of the keyboard in row order.
    #[must_use]
    pub fn buttons(&self) -> Vec<&InlineKeyboardButton> {
        self.keyboard
            .iter()
            .flat_map(|k| k.inline_keyboard.iter().flatten())
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyboard building blocks
// ─────────────────────────────────────────────────────────────────────────────

/// Button carrying an encoded callback token.
#[must_use]
pub fn button(
    label: impl Into<String>,
    command: ActiveCommand,
    action: CallbackAction,
) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, CallbackToken::new(command, action).to_string())
}

/// First/prev, `page/total`, next/last; `None` when everything fits one page.
#[must_use]
pub fn pagination_row(
    command: ActiveCommand,
    page: usize,
    len: usize,
    page_size: usize,
) -> Option<Vec<InlineKeyboardButton>> {
    if len <= page_size {
        return None;
    }
    let total = page_count(len, page_size);
    let mut row = Vec::with_capacity(5);
    if page > 0 {
        row.push(button("⏮️", command, CallbackAction::FirstPage));
        row.push(button("◀️", command, CallbackAction::PrevPage));
    }
    row.push(button(
        format!("{}/{}", page + 1, total),
        command,
        CallbackAction::PageIndicator,
    ));
    if page + 1 < total {
        row.push(button("▶️", command, CallbackAction::NextPage));
        row.push(button("⏭️", command, CallbackAction::LastPage));
    }
    Some(row)
}

/// One-button row aborting the flow.
#[must_use]
pub fn cancel_row(command: ActiveCommand) -> Vec<InlineKeyboardButton> {
    vec![button(CANCEL_LABEL, command, CallbackAction::Cancel)]
}

/// One-button row going back one screen.
#[must_use]
pub fn back_row(command: ActiveCommand) -> Vec<InlineKeyboardButton> {
    vec![button(BACK_LABEL, command, CallbackAction::Back)]
}

/// `Title - year` line with the title linking to the reference page.
#[must_use]
pub fn movie_line(movie: &crate::radarr::Movie) -> String {
    format!(
        "{} - <i>{}</i>",
        crate::utils::html_link(&movie.reference_url(), &movie.title),
        movie.year
    )
}

/// Joins `lines` one per line until the next one would exceed `budget`
/// characters, then closes with an `...and K more` line.
///
/// Lines are kept whole so markup inside a line is never cut.
#[must_use]
pub fn bounded_lines(lines: &[String], budget: usize) -> String {
    let mut text = String::new();
    let mut used = 0;
    for (shown, line) in lines.iter().enumerate() {
        let cost = line.chars().count() + 1;
        if used + cost > budget {
            let _ = writeln!(text, "...and {} more", lines.len() - shown);
            return text;
        }
        used += cost;
        let _ = writeln!(text, "{line}");
    }
    text
}
