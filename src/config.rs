use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::{OverrideRegistry, OverrideSeed};
use crate::domain::ConfigError;

/// Env var naming a TOML file that takes precedence over the environment
pub const CONFIG_PATH_ENV: &str = "ERROR_BOUNDARY_CONFIG";

const LOG_FORMATS: [&str; 3] = ["json", "pretty", "compact"];
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// One of `json`, `pretty`, `compact`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app_name: String,
    pub listen_addr: String,
    pub logging: LoggingConfig,
    /// HMAC secret for bearer tokens; protected routes are disabled without it
    pub auth_secret: Option<String>,
    pub overrides: Vec<OverrideSeed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "error-boundary".to_string(),
            listen_addr: "0.0.0.0:8080".to_string(),
            logging: LoggingConfig::default(),
            auth_secret: None,
            overrides: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
            listen_addr: lookup("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            logging: LoggingConfig {
                level: lookup("LOG_LEVEL").unwrap_or(defaults.logging.level),
                format: lookup("LOG_FORMAT")
                    .map(|s| s.to_lowercase())
                    .unwrap_or(defaults.logging.format),
            },
            auth_secret: lookup("AUTH_SECRET").filter(|s| !s.is_empty()),
            overrides: lookup("ERROR_OVERRIDES")
                .map(|s| parse_override_seeds(&s))
                .unwrap_or_default(),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from the file named by `ERROR_BOUNDARY_CONFIG` if set, otherwise
    /// from the environment, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::from_toml_file(path)?,
            _ => Self::from_env(),
        };
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_addr.is_empty() {
            return Err("LISTEN_ADDR cannot be empty".to_string());
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(format!(
                "LOG_FORMAT must be one of {}, got '{}'",
                LOG_FORMATS.join(", "),
                self.logging.format
            ));
        }

        if let Some(secret) = &self.auth_secret {
            if secret.len() < MIN_SECRET_LEN {
                return Err(format!(
                    "AUTH_SECRET must be at least {} bytes",
                    MIN_SECRET_LEN
                ));
            }
        }

        Ok(())
    }

    /// Registry template seeded from the configured overrides
    pub fn override_registry(&self) -> OverrideRegistry {
        OverrideRegistry::create(self.overrides.iter().cloned())
    }
}

/// Parse `"404=Resource missing;409=Already exists"` into seed records.
///
/// Entries with an unparsable status are kept with status 0 so that registry
/// creation drops them like any other malformed seed.
pub fn parse_override_seeds(raw: &str) -> Vec<OverrideSeed> {
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once('=') {
            Some((status, message)) => {
                OverrideSeed::new(status.trim().parse().unwrap_or(0), message.trim())
            }
            None => OverrideSeed::new(0, item),
        })
        .collect()
}
