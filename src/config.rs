//! Service configuration loaded from environment variables.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::error::{ConfigError, Result};

/// Goal service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listen port.
    #[serde(default = "default_service_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

/// API gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// HTTP listen port.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Base URL of the goal service.
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Largest request body the gateway will buffer and forward.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_service_port() -> u16 {
    3000
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_upstream_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Deserialize a config from `(NAME, value)` pairs; names are matched
/// case-insensitively against field names.
fn from_pairs<T, I>(vars: I) -> Result<T>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (String, String)>,
{
    Ok(envy::from_iter(vars)?)
}

fn validate_common(port: u16, rust_log: &str) -> std::result::Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::ZeroPort);
    }

    EnvFilter::try_new(rust_log).map_err(|e| ConfigError::InvalidLogFilter(e.to_string()))?;

    Ok(())
}

impl ServiceConfig {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from explicit variables.
    pub fn from_vars<I: IntoIterator<Item = (String, String)>>(vars: I) -> Result<Self> {
        from_pairs(vars)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        validate_common(self.port, &self.rust_log)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_service_port(),
            rust_log: default_log_level(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from explicit variables.
    pub fn from_vars<I: IntoIterator<Item = (String, String)>>(vars: I) -> Result<Self> {
        from_pairs(vars)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        validate_common(self.port, &self.rust_log)?;
        self.upstream()?;

        if self.max_body_bytes == 0 {
            return Err(ConfigError::ZeroBodyLimit);
        }

        Ok(())
    }

    /// Parsed upstream base URL.
    pub fn upstream(&self) -> std::result::Result<Url, ConfigError> {
        let url = Url::parse(&self.upstream_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            rust_log: default_log_level(),
            upstream_url: default_upstream_url(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}
