//! Configuration management for motoalerta.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "motoalerta";

/// Default record store file name.
const STORE_FILE_NAME: &str = "incidents.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MOTOALERTA_`)
/// 2. TOML config file at `~/.config/motoalerta/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record store configuration.
    pub store: StoreConfig,
    /// Geolocation configuration.
    pub geolocation: GeolocationConfig,
    /// AI analysis configuration.
    pub analysis: AnalysisConfig,
}

/// Record store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the incident store file.
    /// Defaults to `~/.local/share/motoalerta/incidents.json`
    pub path: Option<PathBuf>,
}

/// Geolocation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// URL of the ip-geolocation endpoint.
    pub provider_url: String,
    /// Seconds to wait for a position fix before giving up.
    pub timeout_secs: u64,
    /// Request the most accurate fix the provider can produce.
    pub high_accuracy: bool,
}

/// AI analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// API key for the text-generation service.
    /// Usually supplied via `MOTOALERTA_ANALYSIS_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the generation service.
    pub endpoint: String,
    /// Model identifier to request.
    pub model: String,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            provider_url: "https://ipapi.co/json".to_string(),
            timeout_secs: 10,
            high_accuracy: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
        }
    }
}

/// Map a prefixed environment key onto its nested config key.
///
/// A plain `_` split would shred field names that themselves contain
/// underscores (`timeout_secs`, `api_key`, ...), so the known keys are
/// mapped explicitly.
fn map_env_key(key: &figment::value::UncasedStr) -> figment::value::Uncased<'static> {
    match key.as_str().to_ascii_lowercase().as_str() {
        "store_path" => "store.path".into(),
        "geolocation_provider_url" => "geolocation.provider_url".into(),
        "geolocation_timeout_secs" => "geolocation.timeout_secs".into(),
        "geolocation_high_accuracy" => "geolocation.high_accuracy".into(),
        "analysis_api_key" => "analysis.api_key".into(),
        "analysis_endpoint" => "analysis.endpoint".into(),
        "analysis_model" => "analysis.model".into(),
        other => other.to_string().into(),
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `MOTOALERTA_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("MOTOALERTA_").map(|key| map_env_key(key)));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.geolocation.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "geolocation timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.geolocation.provider_url.is_empty() {
            return Err(Error::ConfigValidation {
                message: "geolocation provider_url must not be empty".to_string(),
            });
        }

        if self.analysis.endpoint.is_empty() {
            return Err(Error::ConfigValidation {
                message: "analysis endpoint must not be empty".to_string(),
            });
        }

        if self.analysis.model.is_empty() {
            return Err(Error::ConfigValidation {
                message: "analysis model must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the store path, resolving defaults if not set.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(STORE_FILE_NAME))
    }

    /// Get the geolocation timeout as a Duration.
    #[must_use]
    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.store.path.is_none());
        assert_eq!(config.geolocation.timeout_secs, 10);
        assert!(config.geolocation.high_accuracy);
        assert!(config.analysis.api_key.is_none());
        assert_eq!(config.analysis.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.geolocation.timeout_secs = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validate_empty_provider_url() {
        let mut config = Config::default();
        config.geolocation.provider_url = String::new();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("provider_url"));
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = Config::default();
        config.analysis.model = String::new();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("model"));
    }

    #[test]
    fn test_validate_empty_endpoint() {
        let mut config = Config::default();
        config.analysis.endpoint = String::new();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("endpoint"));
    }

    #[test]
    fn test_store_path_default() {
        let config = Config::default();
        let path = config.store_path();

        assert!(path.to_string_lossy().contains("incidents.json"));
    }

    #[test]
    fn test_store_path_custom() {
        let mut config = Config::default();
        config.store.path = Some(PathBuf::from("/custom/path/records.json"));

        assert_eq!(
            config.store_path(),
            PathBuf::from("/custom/path/records.json")
        );
    }

    #[test]
    fn test_geolocation_timeout() {
        let config = Config::default();
        assert_eq!(config.geolocation_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("motoalerta"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("motoalerta"));
    }

    use figment::value::UncasedStr;

    #[test]
    fn test_map_env_key_known_keys() {
        assert_eq!(
            map_env_key(UncasedStr::new("GEOLOCATION_TIMEOUT_SECS")).as_str(),
            "geolocation.timeout_secs"
        );
        assert_eq!(
            map_env_key(UncasedStr::new("analysis_api_key")).as_str(),
            "analysis.api_key"
        );
        assert_eq!(
            map_env_key(UncasedStr::new("STORE_PATH")).as_str(),
            "store.path"
        );
    }

    #[test]
    fn test_map_env_key_unknown_key_passes_through() {
        assert_eq!(
            map_env_key(UncasedStr::new("Unknown_Key")).as_str(),
            "unknown_key"
        );
    }

    #[test]
    fn test_env_overrides_underscored_fields() {
        std::env::set_var("MOTOALERTA_GEOLOCATION_TIMEOUT_SECS", "25");
        std::env::set_var("MOTOALERTA_ANALYSIS_MODEL", "gemini-2.0-flash");

        let config =
            Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.geolocation.timeout_secs, 25);
        assert_eq!(config.analysis.model, "gemini-2.0-flash");

        std::env::remove_var("MOTOALERTA_GEOLOCATION_TIMEOUT_SECS");
        std::env::remove_var("MOTOALERTA_ANALYSIS_MODEL");
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("provider_url"));
        assert!(json.contains("timeout_secs"));
    }

    #[test]
    fn test_analysis_config_deserialize() {
        let json = r#"{"model": "gemini-2.0-flash", "endpoint": "https://example.test"}"#;
        let analysis: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.model, "gemini-2.0-flash");
        assert_eq!(analysis.endpoint, "https://example.test");
        assert!(analysis.api_key.is_none());
    }

    #[test]
    fn test_api_key_not_serialized_when_absent() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
