//! Configuration management for the City Explorer gateway
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::GatewayError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "CITY_EXPLORER_CONFIG";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Inbound HTTP server settings
    pub server: ServerConfig,
    /// Location store settings
    pub store: StoreConfig,
    /// Outbound HTTP client settings
    pub http: HttpConfig,
    /// Per-provider endpoints and credentials
    pub providers: ProvidersConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on handling a single inbound request
    pub request_timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the embedded location database
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout for a single outbound provider call
    pub timeout_seconds: u32,
    pub user_agent: String,
}

/// Endpoint and credential for one provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ProviderSettings {
    fn with_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: None,
        }
    }

    /// Configured key, or an empty string so the provider rejects the call
    #[must_use]
    pub fn key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub geocode: ProviderSettings,
    pub weather: ProviderSettings,
    pub parks: ProviderSettings,
    pub movies: ProviderSettings,
    pub restaurants: ProviderSettings,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3111,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "city_explorer_db".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: concat!("city-explorer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocode: ProviderSettings::with_url("https://us1.locationiq.com/v1/search.php"),
            weather: ProviderSettings::with_url("https://api.weatherbit.io/v2.0/forecast/daily"),
            parks: ProviderSettings::with_url("https://developer.nps.gov/api/v1/parks"),
            movies: ProviderSettings::with_url("https://api.themoviedb.org/3/search/movie"),
            restaurants: ProviderSettings::with_url("https://api.yelp.com/v3/businesses/search"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let defaults = Config::try_from(&GatewayConfig::default())
            .with_context(|| "Failed to build default configuration")?;
        let mut builder = Config::builder().add_source(defaults);

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // e.g. CITY_EXPLORER_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("CITY_EXPLORER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GatewayConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("city-explorer").join("config.toml"))
    }

    /// Apply the conventional unprefixed variables (`PORT`, `GEOCODE_API_KEY`, ...).
    ///
    /// These win over every other source so an existing `.env` keeps working.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| GatewayError::config(format!("Invalid PORT '{port}'")))?;
        }
        if let Some(path) = lookup("DATABASE_URL") {
            self.store.path = path;
        }

        let keys = [
            ("GEOCODE_API_KEY", &mut self.providers.geocode),
            ("WEATHER_API_KEY", &mut self.providers.weather),
            ("PARKS_API_KEY", &mut self.providers.parks),
            ("MOVIE_API_KEY", &mut self.providers.movies),
            ("YELP_API_KEY", &mut self.providers.restaurants),
        ];
        for (name, provider) in keys {
            if let Some(key) = lookup(name) {
                provider.api_key = Some(key);
            }
        }
        Ok(())
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_providers()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 || self.http.timeout_seconds > 120 {
            return Err(GatewayError::config(
                "Provider timeout must be between 1 and 120 seconds",
            )
            .into());
        }

        if self.server.request_timeout_seconds == 0 || self.server.request_timeout_seconds > 300 {
            return Err(GatewayError::config(
                "Request timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GatewayError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GatewayError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.store.path.trim().is_empty() {
            return Err(GatewayError::config("Store path cannot be empty").into());
        }

        Ok(())
    }

    fn validate_providers(&self) -> Result<()> {
        let providers = [
            ("geocode", &self.providers.geocode),
            ("weather", &self.providers.weather),
            ("parks", &self.providers.parks),
            ("movies", &self.providers.movies),
            ("restaurants", &self.providers.restaurants),
        ];

        for (name, provider) in providers {
            if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://")
            {
                return Err(GatewayError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
            if provider.api_key.as_deref().is_some_and(str::is_empty) {
                return Err(GatewayError::config(format!(
                    "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                ))
                .into());
            }
        }

        Ok(())
    }
}
