//! Inline keyboard callback payloads.
//!
//! Payloads are `"<command>:<action>[:<argument>]"`, decoded once when a
//! click arrives. Anything that does not decode is treated as stale.

use std::fmt;

/// Flow that owns a user's callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveCommand {
    /// `/delete`
    Delete,
    /// `/add`
    Add,
}

impl ActiveCommand {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Delete => "del",
            Self::Add => "add",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "del" => Some(Self::Delete),
            "add" => Some(Self::Add),
            _ => None,
        }
    }
}

/// What a button click asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Row click, carries the catalog (TMDB) id
    Select(String),
    /// Jump to the first page
    FirstPage,
    /// One page back
    PrevPage,
    /// One page forward
    NextPage,
    /// Jump to the last page
    LastPage,
    /// The "page/total" label; ignored
    PageIndicator,
    /// Move on to confirmation
    Submit,
    /// Abort and clear the session
    Cancel,
    /// Return to the previous screen
    Back,
    /// Execute the action
    Confirm,
    /// Add the movie and search for it right away
    ConfirmAndSearch,
    /// Quality profile choice
    Profile(i64),
    /// Root folder choice
    RootFolder(i64),
}

/// Decoded callback payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackToken {
    /// Flow the button was rendered for
    pub command: ActiveCommand,
    /// Requested transition
    pub action: CallbackAction,
}

impl CallbackToken {
    /// Pair an action with its owning flow.
    #[must_use]
    pub const fn new(command: ActiveCommand, action: CallbackAction) -> Self {
        Self { command, action }
    }

    /// Decode a payload string.
    ///
    /// # Examples
    ///
    /// ```
    /// use radarr_bot::bot::callback::{ActiveCommand, CallbackAction, CallbackToken};
    /// let token = CallbackToken::parse("del:sel:603");
    /// assert_eq!(
    ///     token,
    ///     Some(CallbackToken::new(ActiveCommand::Delete, CallbackAction::Select("603".into())))
    /// );
    /// assert_eq!(CallbackToken::parse("del:sel:abc"), None);
    /// ```
    #[must_use]
    pub fn parse(data: &str) -> Option<Self> {
        let mut parts = data.splitn(3, ':');
        let command = ActiveCommand::from_prefix(parts.next()?)?;
        let verb = parts.next()?;
        let arg = parts.next();

        let action = match (verb, arg) {
            ("sel", Some(id)) if is_numeric(id) => CallbackAction::Select(id.to_string()),
            ("first", None) => CallbackAction::FirstPage,
            ("prev", None) => CallbackAction::PrevPage,
            ("next", None) => CallbackAction::NextPage,
            ("last", None) => CallbackAction::LastPage,
            ("page", None) => CallbackAction::PageIndicator,
            ("submit", None) => CallbackAction::Submit,
            ("cancel", None) => CallbackAction::Cancel,
            ("back", None) => CallbackAction::Back,
            ("yes", None) => CallbackAction::Confirm,
            ("yes_search", None) => CallbackAction::ConfirmAndSearch,
            ("prof", Some(id)) => CallbackAction::Profile(id.parse().ok()?),
            ("root", Some(id)) => CallbackAction::RootFolder(id.parse().ok()?),
            _ => return None,
        };
        Some(Self { command, action })
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.len() <= 20 && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.command.prefix();
        match &self.action {
            CallbackAction::Select(id) => write!(f, "{prefix}:sel:{id}"),
            CallbackAction::FirstPage => write!(f, "{prefix}:first"),
            CallbackAction::PrevPage => write!(f, "{prefix}:prev"),
            CallbackAction::NextPage => write!(f, "{prefix}:next"),
            CallbackAction::LastPage => write!(f, "{prefix}:last"),
            CallbackAction::PageIndicator => write!(f, "{prefix}:page"),
            CallbackAction::Submit => write!(f, "{prefix}:submit"),
            CallbackAction::Cancel => write!(f, "{prefix}:cancel"),
            CallbackAction::Back => write!(f, "{prefix}:back"),
            CallbackAction::Confirm => write!(f, "{prefix}:yes"),
            CallbackAction::ConfirmAndSearch => write!(f, "{prefix}:yes_search"),
            CallbackAction::Profile(id) => write!(f, "{prefix}:prof:{id}"),
            CallbackAction::RootFolder(id) => write!(f, "{prefix}:root:{id}"),
        }
    }
}
