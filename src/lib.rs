//! Telegram front-end for a Radarr movie library.
//!
//! Users browse, add and delete movies through inline keyboards; Radarr
//! does the actual library work.

/// Telegram bot: flows, views and update handling
pub mod bot;
/// Settings and constants
pub mod config;
/// Radarr API client
pub mod radarr;
/// Telegram dispatcher setup
pub mod runner;
/// Text and retry helpers
pub mod utils;

#[cfg(test)]
mod testing;
