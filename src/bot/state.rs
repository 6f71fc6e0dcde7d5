//! Per-user conversation state for the command flows.

use crate::bot::callback::ActiveCommand;
use crate::bot::selection::{clamp_page, sort_by_title};
use crate::radarr::{Movie, QualityProfile, RootFolder};
use std::collections::HashMap;

/// The single message a flow keeps repainting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageAnchor {
    /// Chat the message lives in
    pub chat_id: i64,
    /// Message id inside that chat
    pub message_id: i32,
}

/// Catalog id (string form) to movie, for resolving row clicks.
pub type CatalogIndex = HashMap<String, Movie>;

/// Builds a catalog index from any number of movie lists.
#[must_use]
pub fn catalog_index<'a>(movies: impl IntoIterator<Item = &'a Movie>) -> CatalogIndex {
    movies
        .into_iter()
        .map(|m| (m.catalog_key(), m.clone()))
        .collect()
}

/// Screen the delete flow is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteView {
    /// Browsing, paging and selecting
    List,
    /// Reviewing the selection
    Confirm,
}

/// State of a `/delete` conversation
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteSession {
    /// Message repainted by every render
    pub anchor: MessageAnchor,
    /// Movies offered for selection, title-sorted
    pub candidates: Vec<Movie>,
    /// Zero-based page into `candidates`
    pub page: usize,
    /// Selected movies in click order
    pub selected: Vec<Movie>,
    /// Row click resolution
    pub catalog_index: CatalogIndex,
    /// Current screen
    pub view: DeleteView,
}

impl DeleteSession {
    /// New session on page 0 with nothing selected.
    #[must_use]
    pub fn new(anchor: MessageAnchor, candidates: Vec<Movie>, catalog_index: CatalogIndex) -> Self {
        let mut session = Self {
            anchor,
            candidates: Vec::new(),
            page: 0,
            selected: Vec::new(),
            catalog_index,
            view: DeleteView::List,
        };
        session.set_candidates(candidates);
        session
    }

    /// Replaces the candidate list, re-sorting it and returning to page 0.
    pub fn set_candidates(&mut self, mut candidates: Vec<Movie>) {
        sort_by_title(&mut candidates);
        self.candidates = candidates;
        self.page = 0;
    }

    /// Keeps `page` inside the candidate list.
    pub fn clamp(&mut self, page_size: usize) {
        self.page = clamp_page(self.page, self.candidates.len(), page_size);
    }
}

/// Step of the `/add` conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStage {
    /// Picking one of several search results
    List,
    /// Checking the picked movie
    ConfirmMovie,
    /// Choosing a quality profile
    Profile,
    /// Choosing a root folder
    RootFolder,
    /// Choosing between add and add-and-search
    Final,
}

/// State of an `/add` conversation
#[derive(Debug, Clone, PartialEq)]
pub struct AddSession {
    /// Message repainted by every render
    pub anchor: MessageAnchor,
    /// Search results, title-sorted
    pub candidates: Vec<Movie>,
    /// Zero-based page into `candidates`
    pub page: usize,
    /// Row click resolution
    pub catalog_index: CatalogIndex,
    /// Picked movie
    pub movie: Option<Movie>,
    /// Profiles offered at the profile step
    pub profiles: Vec<QualityProfile>,
    /// Chosen profile
    pub profile: Option<QualityProfile>,
    /// Folders offered at the folder step
    pub root_folders: Vec<RootFolder>,
    /// Chosen folder
    pub root_folder: Option<RootFolder>,
    /// Current step
    pub stage: AddStage,
}

impl AddSession {
    /// New session listing `candidates`.
    #[must_use]
    pub fn new(anchor: MessageAnchor, mut candidates: Vec<Movie>) -> Self {
        sort_by_title(&mut candidates);
        let catalog_index = catalog_index(&candidates);
        Self {
            anchor,
            candidates,
            page: 0,
            catalog_index,
            movie: None,
            profiles: Vec::new(),
            profile: None,
            root_folders: Vec::new(),
            root_folder: None,
            stage: AddStage::List,
        }
    }
}

/// Active conversation of one user.
///
/// The variant is the active command, so a stored session always has one
/// and removing it clears both at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    /// `/delete` in progress
    Delete(DeleteSession),
    /// `/add` in progress
    Add(AddSession),
}

impl Session {
    /// Flow owning this session
    #[must_use]
    pub const fn command(&self) -> ActiveCommand {
        match self {
            Self::Delete(_) => ActiveCommand::Delete,
            Self::Add(_) => ActiveCommand::Add,
        }
    }

    /// Message this session repaints
    #[must_use]
    pub const fn anchor(&self) -> MessageAnchor {
        match self {
            Self::Delete(s) => s.anchor,
            Self::Add(s) => s.anchor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id: Some(id),
            tmdb_id: id + 1000,
            title: title.to_string(),
            ..Movie::default()
        }
    }

    const ANCHOR: MessageAnchor = MessageAnchor {
        chat_id: 1,
        message_id: 2,
    };

    #[test]
    fn test_replacing_candidates_resorts_and_resets_page() {
        let mut session = DeleteSession::new(
            ANCHOR,
            vec![movie(1, "Zodiac"), movie(2, "The Abyss")],
            CatalogIndex::new(),
        );
        assert_eq!(session.candidates[0].title, "The Abyss");

        session.page = 4;
        session.set_candidates(vec![movie(3, "Heat"), movie(4, "Alien")]);
        assert_eq!(session.candidates[0].title, "Alien");
        assert_eq!(session.page, 0);
    }

    #[test]
    fn test_catalog_index_keys_by_tmdb_id() {
        let movies = [movie(1, "Heat")];
        let index = catalog_index(&movies);
        assert_eq!(index.get("1001").map(|m| m.title.as_str()), Some("Heat"));
    }

    #[test]
    fn test_session_reports_its_command() {
        let session = Session::Add(AddSession::new(ANCHOR, vec![]));
        assert_eq!(session.command(), ActiveCommand::Add);
        assert_eq!(session.anchor(), ANCHOR);
    }
}
