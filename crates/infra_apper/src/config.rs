//! Record service connection settings
//!
//! Settings come from `APPER_*` environment variables:
//!
//! | Variable             | Field          | Default |
//! |----------------------|----------------|---------|
//! | `APPER_PROJECT_ID`   | `project_id`   | required |
//! | `APPER_PUBLIC_KEY`   | `public_key`   | required |
//! | `APPER_BASE_URL`     | `base_url`     | required |
//! | `APPER_TIMEOUT_SECS` | `timeout_secs` | 30      |

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::error::ApperError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Connection settings for the hosted record service
///
/// # Example
///
/// ```rust
/// use infra_apper::ApperConfig;
/// use std::time::Duration;
///
/// let config = ApperConfig::new("proj-1", "pk_live_123", "https://records.example.com/api")
///     .timeout_secs(10);
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// ```
#[derive(Clone, Deserialize)]
pub struct ApperConfig {
    /// Project the `property_c` table belongs to
    pub project_id: String,
    /// Public API key, sent as a bearer token
    pub public_key: String,
    /// Root URL of the record service API
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApperConfig {
    /// Creates a configuration with the default timeout
    pub fn new(
        project_id: impl Into<String>,
        public_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            public_key: public_key.into(),
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the per-request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Loads configuration from `APPER_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns `ApperError::Config` when a required variable is missing or
    /// malformed, and `ApperError::InvalidConfig` when a value is empty.
    pub fn from_env() -> Result<Self, ApperError> {
        let config: Self = config::Config::builder()
            .add_source(config::Environment::with_prefix("APPER").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every required value is present
    pub fn validate(&self) -> Result<(), ApperError> {
        let required = [
            ("project_id", &self.project_id),
            ("public_key", &self.public_key),
            ("base_url", &self.base_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ApperError::InvalidConfig(format!("{} must not be empty", name)));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ApperError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for ApperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApperConfig")
            .field("project_id", &self.project_id)
            .field("public_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_timeout() {
        let config = ApperConfig::new("p", "k", "https://x");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        let config = ApperConfig::new("p", "  ", "https://x");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("public_key"));

        let config = ApperConfig::new("p", "k", "https://x").timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_public_key() {
        let config = ApperConfig::new("p", "pk_secret", "https://x");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("pk_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
