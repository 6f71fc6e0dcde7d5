//! Radarr library backend
//!
//! Record types returned by the Radarr v3 API and the `LibraryBackend`
//! interface the command flows talk to.

mod client;

pub use client::RadarrClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while talking to Radarr
#[derive(Error, Debug)]
pub enum RadarrError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("Radarr request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Radarr answered with a non-success status
    #[error("Radarr returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },
    /// Response body did not match the expected shape
    #[error("Unexpected Radarr response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A movie as known to Radarr, either imported or only a lookup hit.
///
/// `id` is the local library identity and is absent (or zero) for catalog
/// matches that were never imported. `tmdb_id` is the catalog identity and
/// is always present. Fields the bot does not use are kept in `extra` so a
/// lookup result can be posted back unchanged when adding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Local library id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// TMDB id
    pub tmdb_id: i64,
    /// Display title
    pub title: String,
    /// Release year
    #[serde(default)]
    pub year: i32,
    /// IMDb id, e.g. `tt0133093`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    /// URL slug used by Radarr
    #[serde(default)]
    pub title_slug: String,
    /// Remaining fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    /// Local library id, if the movie has been imported.
    #[must_use]
    pub fn library_id(&self) -> Option<i64> {
        self.id.filter(|id| *id != 0)
    }

    /// Catalog id in the string form used by callback payloads.
    #[must_use]
    pub fn catalog_key(&self) -> String {
        self.tmdb_id.to_string()
    }

    /// External reference page for the movie.
    #[must_use]
    pub fn reference_url(&self) -> String {
        match self.imdb_id.as_deref().filter(|id| !id.is_empty()) {
            Some(imdb) => format!("https://www.imdb.com/title/{imdb}"),
            None => format!("https://www.themoviedb.org/movie/{}", self.tmdb_id),
        }
    }
}

/// Quality profile configured in Radarr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Profile id
    pub id: i64,
    /// Profile name
    pub name: String,
}

/// Root folder configured in Radarr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFolder {
    /// Folder id
    pub id: i64,
    /// Absolute path on the Radarr host
    pub path: String,
}

/// Everything needed to add a lookup result to the library
#[derive(Debug, Clone, PartialEq)]
pub struct AddMovie {
    /// Lookup result to import
    pub movie: Movie,
    /// Chosen quality profile id
    pub quality_profile_id: i64,
    /// Chosen root folder path
    pub root_folder_path: String,
    /// Start a search right after adding
    pub search: bool,
}

/// Interface to the library-management service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryBackend: Send + Sync {
    /// Every movie in the library
    async fn list_all(&self) -> Result<Vec<Movie>, RadarrError>;
    /// Catalog search; hits already in the library carry a library id
    async fn lookup(&self, query: String) -> Result<Vec<Movie>, RadarrError>;
    /// Delete several library entries at once
    async fn bulk_delete(&self, ids: Vec<i64>, delete_files: bool) -> Result<(), RadarrError>;
    /// Configured quality profiles
    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, RadarrError>;
    /// Configured root folders
    async fn root_folders(&self) -> Result<Vec<RootFolder>, RadarrError>;
    /// Import a lookup result into the library
    async fn add_movie(&self, request: AddMovie) -> Result<Movie, RadarrError>;
}
