//! API configuration

use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log filter directive, used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
