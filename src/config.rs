//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! The bot token may be given inline or pulled from an environment variable, so the
//! secret never has to live in the file.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Configuration for connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub telegram: TelegramConfig,
}

/// Specific configuration for the Telegram service.
#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_env: Option<String>, // e.g. "TELEGRAM_BOT_TOKEN"
}

impl TelegramConfig {
    /// Resolves the bot access token: the named environment variable wins,
    /// then the inline `token` field.
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(var) = &self.token_env {
            if let Ok(token) = std::env::var(var) {
                if !token.is_empty() {
                    return Ok(token);
                }
            }
        }
        if let Some(token) = &self.token {
            if !token.is_empty() {
                return Ok(token.clone());
            }
        }
        bail!("no telegram bot token configured (set services.telegram.token or token_env)")
    }
}

/// Storage settings for the record store.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "data/projects.db".to_string()
}

impl AppConfig {
    /// Loads the configuration from the given YAML file.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
        let config: AppConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let yaml = "services:\n  telegram:\n    token: \"123:abc\"\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.services.telegram.token.as_deref(), Some("123:abc"));
        assert_eq!(config.storage.database_path, "data/projects.db");
    }

    #[test]
    fn env_var_overrides_inline_token() {
        let config = TelegramConfig {
            token: Some("inline".into()),
            token_env: Some("PORTFOLIO_BOT_TEST_TOKEN".into()),
        };
        unsafe { std::env::set_var("PORTFOLIO_BOT_TEST_TOKEN", "from-env") };
        assert_eq!(config.resolve_token().unwrap(), "from-env");
        unsafe { std::env::remove_var("PORTFOLIO_BOT_TEST_TOKEN") };
        assert_eq!(config.resolve_token().unwrap(), "inline");
    }

    #[test]
    fn missing_token_is_an_error() {
        let config = TelegramConfig {
            token: None,
            token_env: None,
        };
        assert!(config.resolve_token().is_err());
    }
}
