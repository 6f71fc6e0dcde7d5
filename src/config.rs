//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! bot-wide constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    #[serde(alias = "telegram_bot_token")]
    pub telegram_token: String,

    /// Comma-separated list of user IDs allowed to talk to the bot
    #[serde(rename = "allowed_users", alias = "bot_allowed_userids")]
    pub allowed_users_str: Option<String>,

    /// Number of movies shown per keyboard page
    #[serde(default = "default_max_items", alias = "bot_max_items")]
    pub max_items: usize,

    /// `http` or `https`
    #[serde(default = "default_radarr_protocol")]
    pub radarr_protocol: String,
    /// Radarr host name or IP
    #[serde(default)]
    pub radarr_hostname: String,
    /// Radarr port
    #[serde(default = "default_radarr_port")]
    pub radarr_port: u16,
    /// Radarr API key
    #[serde(default)]
    pub radarr_api_key: String,
    /// Optional URL base when Radarr runs behind a reverse proxy path
    #[serde(default)]
    pub radarr_base_url: String,
}

const fn default_max_items() -> usize {
    10
}

fn default_radarr_protocol() -> String {
    "http".to_string()
}

const fn default_radarr_port() -> u16 {
    7878
}

impl Settings {
    /// Create new settings by loading from files and environment
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use radarr_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading or validation fails.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Local overrides, not checked into git
            .add_source(File::with_name("config/local").required(false))
            // Unprefixed variables, e.g. TELEGRAM_TOKEN
            .add_source(Environment::default().ignore_empty(true))
            // Prefixed variables win, e.g. RBOT_TELEGRAM_TOKEN
            .add_source(Environment::with_prefix("RBOT").ignore_empty(true))
            .build()?;

        let mut settings: Self = s.try_deserialize()?;
        settings.radarr_protocol = settings.radarr_protocol.to_lowercase();
        settings.validate()?;
        Ok(settings)
    }

    /// Checks values that deserialization alone cannot reject.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram_token.trim().is_empty() {
            return Err(ConfigError::Message("telegram_token is empty".into()));
        }
        if self.max_items == 0 {
            return Err(ConfigError::Message("max_items must be at least 1".into()));
        }
        if self.radarr_protocol != "http" && self.radarr_protocol != "https" {
            return Err(ConfigError::Message(
                "radarr_protocol must be http or https".into(),
            ));
        }
        if self.radarr_hostname.trim().is_empty() {
            return Err(ConfigError::Message("radarr_hostname is empty or not set".into()));
        }
        if self.radarr_api_key.trim().is_empty() {
            return Err(ConfigError::Message("radarr_api_key is empty or not set".into()));
        }
        Ok(())
    }

    /// Returns a set of Telegram IDs that are allowed to use the bot
    #[must_use]
    pub fn allowed_users(&self) -> HashSet<i64> {
        self.allowed_users_str
            .as_ref()
            .map(|s| {
                s.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .filter_map(|id| id.parse::<i64>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Base URL of the Radarr server, without a trailing slash
    ///
    /// # Examples
    ///
    /// ```
    /// use radarr_bot::config::Settings;
    /// let mut settings = Settings::for_radarr("radarr.lan", "key");
    /// settings.radarr_base_url = "/radarr/".to_string();
    /// assert_eq!(settings.radarr_url(), "http://radarr.lan:7878/radarr");
    /// ```
    #[must_use]
    pub fn radarr_url(&self) -> String {
        let base = self.radarr_base_url.trim_matches('/');
        let mut url = format!(
            "{}://{}:{}",
            self.radarr_protocol, self.radarr_hostname, self.radarr_port
        );
        if !base.is_empty() {
            url.push('/');
            url.push_str(base);
        }
        url
    }

    /// Settings with defaults for everything except the Radarr host and key.
    #[must_use]
    pub fn for_radarr(hostname: &str, api_key: &str) -> Self {
        Self {
            telegram_token: "token".to_string(),
            allowed_users_str: None,
            max_items: default_max_items(),
            radarr_protocol: default_radarr_protocol(),
            radarr_hostname: hostname.to_string(),
            radarr_port: default_radarr_port(),
            radarr_api_key: api_key.to_string(),
            radarr_base_url: String::new(),
        }
    }
}

/// Searches returning more candidates than this are rejected.
pub const SEARCH_RESULT_LIMIT: usize = 25;

/// Timeout for a single Radarr HTTP request
pub const RADARR_TIMEOUT_SECS: u64 = 30;

/// Initial backoff for retried Telegram API calls
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound for the backoff between retries
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4000;
/// Attempts before a Telegram API call is given up
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Single test touching the process environment to avoid races
    #[test]
    fn test_config_env_loading() -> Result<(), Box<dyn std::error::Error>> {
        env::set_var("RBOT_TELEGRAM_TOKEN", "dummy_token");
        env::set_var("RBOT_RADARR_HOSTNAME", "radarr.local");
        env::set_var("RBOT_RADARR_API_KEY", "secret");
        env::set_var("RBOT_RADARR_PROTOCOL", "HTTPS");
        env::set_var("RBOT_MAX_ITEMS", "5");

        let settings = Settings::new()?;
        assert_eq!(settings.telegram_token, "dummy_token");
        assert_eq!(settings.radarr_protocol, "https");
        assert_eq!(settings.max_items, 5);
        assert_eq!(settings.radarr_url(), "https://radarr.local:7878");

        env::set_var("RBOT_MAX_ITEMS", "0");
        assert!(Settings::new().is_err());

        for key in [
            "RBOT_TELEGRAM_TOKEN",
            "RBOT_RADARR_HOSTNAME",
            "RBOT_RADARR_API_KEY",
            "RBOT_RADARR_PROTOCOL",
            "RBOT_MAX_ITEMS",
        ] {
            env::remove_var(key);
        }

        // keys used by existing deployments
        let legacy = [
            ("RBOT_TELEGRAM_BOT_TOKEN", "legacy_token"),
            ("RBOT_BOT_ALLOWED_USERIDS", "11,22"),
            ("RBOT_BOT_MAX_ITEMS", "7"),
            ("RBOT_RADARR_HOSTNAME", "radarr.local"),
            ("RBOT_RADARR_API_KEY", "secret"),
        ];
        for (key, value) in legacy {
            env::set_var(key, value);
        }
        let settings = Settings::new()?;
        assert_eq!(settings.telegram_token, "legacy_token");
        assert_eq!(settings.max_items, 7);
        assert_eq!(settings.allowed_users(), HashSet::from([11, 22]));
        for (key, _) in legacy {
            env::remove_var(key);
        }
        Ok(())
    }

    #[test]
    fn test_list_parsing() {
        let mut settings = Settings::for_radarr("localhost", "key");

        settings.allowed_users_str = Some("123,456".to_string());
        let allowed = settings.allowed_users();
        assert!(allowed.contains(&123));
        assert!(allowed.contains(&456));
        assert_eq!(allowed.len(), 2);

        settings.allowed_users_str = Some("333; 444, 555".to_string());
        assert_eq!(settings.allowed_users().len(), 3);

        settings.allowed_users_str = Some("abc, 777".to_string());
        let allowed = settings.allowed_users();
        assert!(allowed.contains(&777));
        assert_eq!(allowed.len(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::for_radarr("localhost", "key");
        assert!(settings.validate().is_ok());

        settings.radarr_protocol = "ftp".to_string();
        assert!(settings.validate().is_err());

        settings.radarr_protocol = "http".to_string();
        settings.radarr_api_key = " ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_radarr_url_without_base() {
        let mut settings = Settings::for_radarr("10.0.0.2", "key");
        settings.radarr_port = 80;
        assert_eq!(settings.radarr_url(), "http://10.0.0.2:80");
    }
}
