//! Places provider configuration

use serde::{Deserialize, Serialize};

use super::PlacesError;

/// Places provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Language for display names and addresses
    #[serde(rename = "language-code")]
    pub language_code: String,

    /// Maximum results per search (provider caps this at 20)
    #[serde(rename = "max-results")]
    pub max_results: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GOOGLE_MAPS_API_KEY".to_string(),
            base_url: "https://places.googleapis.com".to_string(),
            language_code: "ja".to_string(),
            max_results: 20,
            timeout_ms: 10_000,
        }
    }
}

impl PlacesConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String, PlacesError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(PlacesError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlacesConfig::default();
        assert_eq!(config.api_key_env, "GOOGLE_MAPS_API_KEY");
        assert_eq!(config.base_url, "https://places.googleapis.com");
        assert_eq!(config.max_results, 20);
    }

    #[test]
    fn test_missing_api_key() {
        let config = PlacesConfig {
            api_key_env: "TRIPPLAN_TEST_UNSET_PLACES_KEY".to_string(),
            ..Default::default()
        };
        let err = config.get_api_key().unwrap_err();
        assert!(matches!(err, PlacesError::MissingApiKey(ref name) if name == "TRIPPLAN_TEST_UNSET_PLACES_KEY"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "language-code: en\nmax-results: 5\n";
        let config: PlacesConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.language_code, "en");
        assert_eq!(config.max_results, 5);
        assert_eq!(config.timeout_ms, 10_000);
    }
}
