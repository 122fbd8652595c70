//! TripBot configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tripplan::{PlacesConfig, SearchConfig};

use crate::webhook::ChannelSecret;

/// Main TripBot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Messaging platform configuration
    pub line: LineConfig,

    /// Places provider configuration
    pub places: PlacesConfig,

    /// Search behaviour
    pub search: SearchConfig,
}

impl Config {
    /// Validate configuration before serving
    ///
    /// Checks that every secret the server needs is present in the
    /// environment. Call this early in startup to fail fast with clear error
    /// messages.
    pub fn validate(&self) -> Result<()> {
        self.line.get_channel_secret()?;
        self.line.get_access_token()?;
        self.places.get_api_key().map_err(|e| eyre::eyre!(e))?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tripbot.yml
        let local_config = PathBuf::from(".tripbot.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tripbot/tripbot.yml
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Follows the same fallback chain as `load` but never fails.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = [
            config_path.cloned(),
            Some(PathBuf::from(".tripbot.yml")),
            user_config_path(),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tripbot").join("tripbot.yml"))
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the webhook server to
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Messaging platform (LINE) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Environment variable containing the channel secret (webhook signing key)
    #[serde(rename = "channel-secret-env")]
    pub channel_secret_env: String,

    /// Environment variable containing the channel access token
    #[serde(rename = "channel-access-token-env")]
    pub channel_access_token_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Text sent to users who add the bot
    #[serde(rename = "welcome-message")]
    pub welcome_message: String,

    /// Text sent in reply to free-form messages
    #[serde(rename = "help-message")]
    pub help_message: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret_env: "LINE_CHANNEL_SECRET".to_string(),
            channel_access_token_env: "LINE_CHANNEL_ACCESS_TOKEN".to_string(),
            base_url: "https://api.line.me".to_string(),
            timeout_ms: 10_000,
            welcome_message: "Thanks for adding TripBot! Open the menu and tap \"Create plan\" to start planning your trip."
                .to_string(),
            help_message: "Tap \"Create plan\" in the menu to plan a trip, or \"My plans\" to see the ones you made."
                .to_string(),
        }
    }
}

impl LineConfig {
    /// Read the channel secret from the configured environment variable
    pub fn get_channel_secret(&self) -> Result<ChannelSecret> {
        debug!(env = %self.channel_secret_env, "get_channel_secret: called");
        read_env(&self.channel_secret_env, "channel secret").map(ChannelSecret::new)
    }

    /// Read the channel access token from the configured environment variable
    pub fn get_access_token(&self) -> Result<String> {
        debug!(env = %self.channel_access_token_env, "get_access_token: called");
        read_env(&self.channel_access_token_env, "channel access token")
    }
}

fn read_env(var: &str, what: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(eyre::eyre!("LINE {} not found. Set the {} environment variable.", what, var)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.line.channel_secret_env, "LINE_CHANNEL_SECRET");
        assert_eq!(config.places.api_key_env, "GOOGLE_MAPS_API_KEY");
        assert_eq!(config.search.debounce_ms, 300);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: debug

server:
  bind: 127.0.0.1:8080

line:
  channel-secret-env: MY_SECRET
  base-url: http://localhost:9000
  welcome-message: "ようこそ！"

places:
  language-code: en
  max-results: 10

search:
  debounce-ms: 150
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.line.channel_secret_env, "MY_SECRET");
        assert_eq!(config.line.base_url, "http://localhost:9000");
        assert_eq!(config.line.welcome_message, "ようこそ！");
        assert_eq!(config.places.language_code, "en");
        assert_eq!(config.places.max_results, 10);
        assert_eq!(config.search.debounce_ms, 150);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
line:
  timeout-ms: 5000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.line.timeout_ms, 5000);
        assert_eq!(config.line.channel_access_token_env, "LINE_CHANNEL_ACCESS_TOKEN");
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_load_from_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tripbot.yml");
        fs::write(&path, "log-level: warn\nserver:\n  bind: 127.0.0.1:4000\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:4000");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    #[serial]
    fn test_secrets_from_env() {
        let line = LineConfig {
            channel_secret_env: "TRIPBOT_TEST_SECRET".to_string(),
            channel_access_token_env: "TRIPBOT_TEST_TOKEN".to_string(),
            ..Default::default()
        };

        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("TRIPBOT_TEST_SECRET", "s3cret");
            std::env::remove_var("TRIPBOT_TEST_TOKEN");
        }

        let secret = line.get_channel_secret().unwrap();
        assert_eq!(secret.expose(), "s3cret");

        let err = line.get_access_token().unwrap_err();
        assert!(err.to_string().contains("TRIPBOT_TEST_TOKEN"));

        unsafe {
            std::env::remove_var("TRIPBOT_TEST_SECRET");
        }
    }

    #[test]
    #[serial]
    fn test_validate_reports_missing_secret() {
        let config = Config {
            line: LineConfig {
                channel_secret_env: "TRIPBOT_TEST_UNSET_SECRET".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        unsafe {
            std::env::remove_var("TRIPBOT_TEST_UNSET_SECRET");
        }

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("TRIPBOT_TEST_UNSET_SECRET"));
    }
}
