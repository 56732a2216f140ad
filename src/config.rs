//! Configuration management for the `TempBoard` dashboard
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TempBoardError;
use crate::models::location;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `TempBoard` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather service (NWS) settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Prediction market settings
    #[serde(default)]
    pub markets: MarketsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the NWS API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// User-Agent sent with every NWS request
    #[serde(default = "default_weather_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Prediction market configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketsConfig {
    /// Whether market quotes are fetched at all
    #[serde(default = "default_markets_enabled")]
    pub enabled: bool,
    /// Base URL of the Kalshi trade API
    #[serde(default = "default_markets_base_url")]
    pub base_url: String,
    /// Optional pass-through relay; requests become `{relay_url}?url=<encoded>`
    #[serde(default)]
    pub relay_url: Option<String>,
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

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Location code shown when a request does not select one
    #[serde(default = "default_location")]
    pub location: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_weather_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_weather_user_agent() -> String {
    "WeatherDashboard (weather-app)".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_markets_enabled() -> bool {
    true
}

fn default_markets_base_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_location() -> String {
    "KAUS".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            user_agent: default_weather_user_agent(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for MarketsConfig {
    fn default() -> Self {
        Self {
            enabled: default_markets_enabled(),
            base_url: default_markets_base_url(),
            relay_url: None,
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

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config_path`, or the default file location
    /// when `None`, layered under `TEMPBOARD_` environment variables
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

        // TEMPBOARD_WEATHER__BASE_URL -> weather.base_url
        builder = builder.add_source(
            Environment::with_prefix("TEMPBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tempboard").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.user_agent.is_empty() {
            self.weather.user_agent = default_weather_user_agent();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.markets.base_url.is_empty() {
            self.markets.base_url = default_markets_base_url();
        }
        if self
            .markets
            .relay_url
            .as_ref()
            .is_some_and(|url| url.is_empty())
        {
            self.markets.relay_url = None;
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.location.is_empty() {
            self.defaults.location = default_location();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_urls()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(TempBoardError::config(
                "Weather API timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TempBoardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TempBoardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if location::find(&self.defaults.location).is_none() {
            return Err(TempBoardError::config(format!(
                "Unknown default location '{}'",
                self.defaults.location
            ))
            .into());
        }

        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        let mut urls = vec![
            ("weather.base_url", self.weather.base_url.as_str()),
            ("markets.base_url", self.markets.base_url.as_str()),
        ];
        if let Some(relay) = &self.markets.relay_url {
            urls.push(("markets.relay_url", relay.as_str()));
        }

        for (key, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TempBoardError::config(format!(
                    "{key} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }
}
