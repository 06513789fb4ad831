use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable that overrides `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "NIMBUS_BACKEND_URL";

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

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Fixed position used as the geolocation capability
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the server exposing `/api/current_weather`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout. Unset means the HTTP stack's default applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl LocationConfig {
    /// Both halves of the position, or `None` when either is missing.
    pub fn position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl Config {
    /// Load configuration from the default path, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config.with_env_overrides());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.is_empty() {
                tracing::debug!("Backend URL overridden by {}", BACKEND_URL_ENV);
                self.backend.base_url = url;
            }
        }
        self
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.backend.base_url, "backend.base_url", &mut result);

        if self.backend.request_timeout_secs == Some(0) {
            result.add_error(
                "backend.request_timeout_secs",
                "Timeout must be greater than 0 (omit it to use the default)",
            );
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(_), None) | (None, Some(_)) => {
                result.add_warning(
                    "location",
                    "Only one of latitude/longitude is set; geolocation is disabled",
                );
            }
            _ => {}
        }

        if let Some(lat) = self.location.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                result.add_error("location.latitude", "Latitude must be within -90..=90");
            }
        }

        if let Some(lon) = self.location.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                result.add_error("location.longitude", "Longitude must be within -180..=180");
            }
        }

        result
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
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

            if url.port() == Some(0) {
                result.add_error(field_name, "Port cannot be 0");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
