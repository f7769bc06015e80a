//! Bot configuration loaded from the environment (and `.env`, when present).

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::scraper::BASE_URL;

pub const DEFAULT_LOG_FILE: &str = "faceit_bot.log";

#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram Bot API token.
    pub bot_token: String,
    /// SQLite database file holding user registrations.
    pub db_path: PathBuf,
    /// Directory with the Montserrat font files used on the card.
    pub fonts_dir: PathBuf,
    pub log_file: PathBuf,
    /// Origin of the stats site.
    pub stats_base_url: String,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            bot_token: required("TELEGRAM_BOT_TOKEN")?,
            db_path: required("DB_PATH")?.into(),
            fonts_dir: lookup("FONTS_DIR")
                .unwrap_or_else(|| "fonts".to_string())
                .into(),
            log_file: lookup("LOG_FILE")
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                .into(),
            stats_base_url: lookup("FACEIT_ANALYSER_URL").unwrap_or_else(|| BASE_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("DB_PATH", "faceit_bot.sqlite3"),
        ]))
        .unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.db_path, PathBuf::from("faceit_bot.sqlite3"));
        assert_eq!(config.fonts_dir, PathBuf::from("fonts"));
        assert_eq!(config.log_file, PathBuf::from("faceit_bot.log"));
        assert_eq!(config.stats_base_url, "https://faceitanalyser.com");
    }

    #[test]
    fn test_config_missing_token() {
        let err = Config::from_lookup(lookup_from(&[("DB_PATH", "db.sqlite3")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TELEGRAM_BOT_TOKEN")));
    }

    #[test]
    fn test_config_blank_db_path() {
        let err = Config::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("DB_PATH", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_PATH")));
    }
}
