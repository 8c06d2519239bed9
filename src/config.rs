//! Configuration management for `Skycast`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkycastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for `Skycast`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// OpenWeatherMap settings (weather, forecast, air quality, primary geocoding)
    #[serde(default)]
    pub openweather: OpenWeatherConfig,
    /// Optional secondary geocoder
    #[serde(default)]
    pub google: GoogleGeocodingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Optional scene decoration
    #[serde(default)]
    pub scene: SceneConfig,
}

/// OpenWeatherMap configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    /// API key, mandatory for every query
    pub api_key: Option<String>,
    /// Base URL shared by the geocoding and data endpoints
    #[serde(default = "default_openweather_base_url")]
    pub base_url: String,
    /// Timeout for geocoding, current and forecast calls
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
    /// Timeout for the air-quality call
    #[serde(default = "default_air_quality_timeout_ms")]
    pub air_quality_timeout_ms: u64,
}

/// Google Geocoding settings; without a key the fallback is disabled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleGeocodingConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_google_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Upper bound for a whole inbound request
    #[serde(default = "default_request_deadline_seconds")]
    pub request_deadline_seconds: u64,
}

/// Scene generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Budget for one generator call; past it the report is sent without a scene
    #[serde(default = "default_scene_timeout_ms")]
    pub timeout_ms: u64,
}

// Default value functions
fn default_openweather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_google_base_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_air_quality_timeout_ms() -> u64 {
    5_000
}

fn default_scene_timeout_ms() -> u64 {
    5_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_server_port() -> u16 {
    9002
}

fn default_request_deadline_seconds() -> u64 {
    30
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openweather_base_url(),
            timeout_ms: default_request_timeout_ms(),
            air_quality_timeout_ms: default_air_quality_timeout_ms(),
        }
    }
}

impl Default for GoogleGeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_google_base_url(),
            timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            request_deadline_seconds: default_request_deadline_seconds(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_scene_timeout_ms(),
        }
    }
}

impl OpenWeatherConfig {
    /// The mandatory API key, or a configuration error
    pub fn require_api_key(&self) -> crate::Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(SkycastError::config(
                "Weather API key is not configured. Set SKYCAST_OPENWEATHER__API_KEY or WEATHER_API_KEY.",
            )),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn air_quality_timeout(&self) -> Duration {
        Duration::from_millis(self.air_quality_timeout_ms)
    }
}

impl GoogleGeocodingConfig {
    /// Key for the secondary geocoder, if the fallback is enabled
    #[must_use]
    pub fn enabled_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl SceneConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl SkycastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SKYCAST_OPENWEATHER__API_KEY -> openweather.api_key
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_legacy_env();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// Fill keys from the variable names older deployments use
    fn apply_legacy_env(&mut self) {
        if self.openweather.api_key.is_none() {
            self.openweather.api_key = std::env::var("WEATHER_API_KEY").ok();
        }
        if self.google.api_key.is_none() {
            self.google.api_key = std::env::var("GOOGLE_GEOCODING_API_KEY").ok();
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.openweather.base_url.is_empty() {
            self.openweather.base_url = default_openweather_base_url();
        }
        if self.openweather.timeout_ms == 0 {
            self.openweather.timeout_ms = default_request_timeout_ms();
        }
        if self.openweather.air_quality_timeout_ms == 0 {
            self.openweather.air_quality_timeout_ms = default_air_quality_timeout_ms();
        }
        if self.google.base_url.is_empty() {
            self.google.base_url = default_google_base_url();
        }
        if self.google.timeout_ms == 0 {
            self.google.timeout_ms = default_request_timeout_ms();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
        if self.server.request_deadline_seconds == 0 {
            self.server.request_deadline_seconds = default_request_deadline_seconds();
        }
        if self.scene.timeout_ms == 0 {
            self.scene.timeout_ms = default_scene_timeout_ms();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// A missing weather key is reported per query, not at load time.
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.openweather.api_key {
            if api_key.trim().is_empty() {
                return Err(SkycastError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        if let Some(api_key) = &self.google.api_key {
            if api_key.trim().is_empty() {
                return Err(SkycastError::config(
                    "Google geocoding API key cannot be empty if provided.",
                )
                .into());
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        const MAX_TIMEOUT_MS: u64 = 120_000;

        if self.openweather.timeout_ms > MAX_TIMEOUT_MS
            || self.openweather.air_quality_timeout_ms > MAX_TIMEOUT_MS
            || self.google.timeout_ms > MAX_TIMEOUT_MS
        {
            return Err(SkycastError::config("Provider timeouts cannot exceed 120000 ms").into());
        }

        if self.scene.timeout_ms > MAX_TIMEOUT_MS {
            return Err(SkycastError::config("Scene timeout cannot exceed 120000 ms").into());
        }

        if self.server.request_deadline_seconds > 300 {
            return Err(
                SkycastError::config("Request deadline cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for url in [&self.openweather.base_url, &self.google.base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkycastError::config(format!(
                    "Provider base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }
}
