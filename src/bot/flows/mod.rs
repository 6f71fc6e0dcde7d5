//! Command flow controllers
//!
//! Each flow is a state machine over its session type. A transition takes
//! the current session by value and returns a [`Step`]: what to store and
//! what to show. Applying the step is left to the dispatcher.

/// `/add` flow
pub mod add;
/// `/delete` flow
pub mod delete;

use crate::bot::state::Session;
use crate::bot::views::Screen;
use crate::radarr::RadarrError;
use tracing::warn;

/// What happens to the user's session
#[derive(Debug, Clone, PartialEq)]
pub enum Next {
    /// Persist this session
    Store(Session),
    /// Remove the session
    Clear,
    /// Keep whatever is stored
    Unchanged,
    /// Session and callback disagree; wipe and tell the user
    Reset,
}

/// What the user sees
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Repaint the flow's message
    Edit(Screen),
    /// Post a new message to the chat
    Send(Screen),
    /// Nothing to show
    Nothing,
}

/// Outcome of one transition
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Session update
    pub next: Next,
    /// Rendering action
    pub reply: Reply,
}

impl Step {
    /// Store `session` and repaint with `screen`.
    #[must_use]
    pub const fn render(session: Session, screen: Screen) -> Self {
        Self {
            next: Next::Store(session),
            reply: Reply::Edit(screen),
        }
    }

    /// Terminal screen: the session is removed (or never created).
    #[must_use]
    pub const fn finish(screen: Screen) -> Self {
        Self {
            next: Next::Clear,
            reply: Reply::Edit(screen),
        }
    }

    /// Terminal informational message.
    #[must_use]
    pub fn finish_with(text: &str) -> Self {
        Self::finish(Screen::notice(text))
    }

    /// Backend failure before any session exists: show the error in place.
    #[must_use]
    pub fn abort(error: &RadarrError) -> Self {
        warn!("Flow aborted by backend error: {error}");
        Self::finish_with(&error.to_string())
    }

    /// Backend failure mid-flow: report it, keep the session for a retry.
    #[must_use]
    pub fn failed(error: &RadarrError) -> Self {
        warn!("Flow step failed, session kept: {error}");
        Self {
            next: Next::Unchanged,
            reply: Reply::Send(Screen::notice(&error.to_string())),
        }
    }

    /// Click that does nothing.
    #[must_use]
    pub const fn ignore() -> Self {
        Self {
            next: Next::Unchanged,
            reply: Reply::Nothing,
        }
    }

    /// Click that does not fit the session.
    #[must_use]
    pub const fn reset() -> Self {
        Self {
            next: Next::Reset,
            reply: Reply::Nothing,
        }
    }
}

/// Page arithmetic shared by the list screens.
///
/// Returns the new page for a navigation action, or `None` for any other
/// action. The result is always clamped.
#[must_use]
pub fn navigate(
    action: &crate::bot::callback::CallbackAction,
    page: usize,
    len: usize,
    page_size: usize,
) -> Option<usize> {
    use crate::bot::callback::CallbackAction;
    use crate::bot::selection::{clamp_page, page_count};

    let page = match action {
        CallbackAction::FirstPage => 0,
        CallbackAction::PrevPage => page.saturating_sub(1),
        CallbackAction::NextPage => page.saturating_add(1),
        CallbackAction::LastPage => page_count(len, page_size) - 1,
        _ => return None,
    };
    Some(clamp_page(page, len, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::callback::CallbackAction;

    #[test]
    fn test_navigate_clamps() {
        assert_eq!(navigate(&CallbackAction::NextPage, 2, 30, 10), Some(2));
        assert_eq!(navigate(&CallbackAction::PrevPage, 0, 30, 10), Some(0));
        assert_eq!(navigate(&CallbackAction::LastPage, 0, 30, 10), Some(2));
        assert_eq!(navigate(&CallbackAction::FirstPage, 2, 30, 10), Some(0));
        assert_eq!(navigate(&CallbackAction::LastPage, 0, 0, 10), Some(0));
        assert_eq!(navigate(&CallbackAction::Submit, 1, 30, 10), None);
    }
}
