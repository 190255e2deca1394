use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "SKYBOARD_API_KEY";

pub const DEFAULT_GEO_BASE_URL: &str = "http://api.openweathermap.org";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_STATIC_BASE_URL: &str =
    "https://raw.githubusercontent.com/bryceSA/world-temp-explorer/main";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single line summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Weather data sources
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Local storage for the weather cache
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Cities fetched on every refresh, in display order
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,

    /// OpenWeatherMap geocoding host
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,

    /// OpenWeatherMap current-weather host
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// Host serving `data/weather_data.json` and `data/forecast_<city>.json`
    #[serde(default = "default_static_base_url")]
    pub static_base_url: String,

    /// How long a cached fetch stays fresh
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,

    /// API key (can be set via SKYBOARD_API_KEY instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_cities() -> Vec<String> {
    ["New York", "Tokyo", "Sydney", "London", "Nairobi"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_geo_base_url() -> String {
    DEFAULT_GEO_BASE_URL.to_string()
}

fn default_weather_base_url() -> String {
    DEFAULT_WEATHER_BASE_URL.to_string()
}

fn default_static_base_url() -> String {
    DEFAULT_STATIC_BASE_URL.to_string()
}

fn default_cache_ttl_minutes() -> u32 {
    60
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            cities: default_cities(),
            geo_base_url: default_geo_base_url(),
            weather_base_url: default_weather_base_url(),
            static_base_url: default_static_base_url(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            api_key: None,
        }
    }
}

impl WeatherConfig {
    /// API key from the environment, falling back to the config file.
    /// Blank values count as unset.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| self.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the cache keys (one file per key)
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    default_config_dir().join("cache")
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skyboard")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, writing defaults there when missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if the file cannot be loaded or validation fails
    /// with critical errors.
    pub fn load_validated() -> std::result::Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load().map_err(|e| ConfigError::Unreadable(format!("{:#}", e)))?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.geo_base_url, "weather.geo_base_url", &mut result);
        self.validate_url(
            &self.weather.weather_base_url,
            "weather.weather_base_url",
            &mut result,
        );
        self.validate_url(
            &self.weather.static_base_url,
            "weather.static_base_url",
            &mut result,
        );

        if self.weather.cities.is_empty() {
            result.add_error("weather.cities", "At least one city is required");
        } else {
            let mut seen = HashSet::new();
            for city in &self.weather.cities {
                if city.trim().is_empty() {
                    result.add_error("weather.cities", "City names cannot be blank");
                } else if !seen.insert(city.as_str()) {
                    result.add_warning(
                        "weather.cities",
                        format!("Duplicate city: {}", city),
                    );
                }
            }
        }

        if self.weather.cache_ttl_minutes == 0 {
            result.add_error(
                "weather.cache_ttl_minutes",
                "Cache freshness window must be greater than 0",
            );
        }

        if self.weather.resolved_api_key().is_none() {
            result.add_warning(
                "weather.api_key",
                format!(
                    "No API key configured (set {}) - live weather is disabled",
                    API_KEY_ENV
                ),
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skyboard");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_default_cities() {
        let config = Config::default();
        assert_eq!(
            config.weather.cities,
            vec!["New York", "Tokyo", "Sydney", "London", "Nairobi"]
        );
        assert_eq!(config.weather.cache_ttl_minutes, 60);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.static_base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.static_base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.geo_base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_empty_city_list() {
        let mut config = Config::default();
        config.weather.cities.clear();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.cities"));
    }

    #[test]
    fn test_duplicate_city_is_warning() {
        let mut config = Config::default();
        config.weather.cities.push("Tokyo".to_string());
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.message.contains("Tokyo")));
    }

    #[test]
    fn test_zero_ttl() {
        let mut config = Config::default();
        config.weather.cache_ttl_minutes = 0;
        let result = config.validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.weather.cities.len(), 5);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.weather.cities, config.weather.cities);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[weather]\ncities = [\"Paris\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.cities, vec!["Paris"]);
        assert_eq!(config.weather.static_base_url, DEFAULT_STATIC_BASE_URL);
        assert_eq!(config.weather.cache_ttl_minutes, 60);
        assert_eq!(config.storage.cache_dir, default_cache_dir());
    }

    #[test]
    fn test_empty_storage_section_uses_default_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather]\ncache_ttl_minutes = 15\n\n[storage]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.cache_ttl_minutes, 15);
        assert_eq!(config.storage.cache_dir, default_cache_dir());
    }

    #[test]
    fn test_custom_cache_dir_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.storage.cache_dir = dir.path().join("weather-cache");
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.storage.cache_dir, dir.path().join("weather-cache"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
