use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::errors::{MortgageError, Result};

/// public endpoint of the rates service
pub const DEFAULT_RATES_ENDPOINT: &str = "https://hypofriend.de/q";
pub const DEFAULT_REFERRER: &str = "https://hypofriend.de";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en,de;q=0.9";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const RATES_ENDPOINT_ENV: &str = "MORTGAGE_RATES_ENDPOINT";
pub const RATES_TIMEOUT_ENV: &str = "MORTGAGE_RATES_TIMEOUT_SECS";

/// rates service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatesServiceConfig {
    pub endpoint: String,
    pub referrer: Option<String>,
    pub accept_language: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RatesServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RATES_ENDPOINT.to_string(),
            referrer: Some(DEFAULT_REFERRER.to_string()),
            accept_language: Some(DEFAULT_ACCEPT_LANGUAGE.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RatesServiceConfig {
    /// create configuration for a custom endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// load from environment, falling back to defaults
    ///
    /// Reads `MORTGAGE_RATES_ENDPOINT` and `MORTGAGE_RATES_TIMEOUT_SECS`,
    /// after loading a `.env` file if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var(RATES_ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        if let Ok(raw) = std::env::var(RATES_TIMEOUT_ENV) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                MortgageError::InvalidConfiguration {
                    message: format!(
                        "{RATES_TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"
                    ),
                }
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_referrer(mut self, referrer: Option<String>) -> Self {
        self.referrer = referrer;
        self
    }

    pub fn with_accept_language(mut self, accept_language: Option<String>) -> Self {
        self.accept_language = accept_language;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// parsed endpoint url
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| MortgageError::InvalidConfiguration {
            message: format!("invalid rates endpoint {:?}: {e}", self.endpoint),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(MortgageError::InvalidConfiguration {
                message: format!("rates endpoint must be http or https, got {}", url.scheme()),
            });
        }

        Ok(url)
    }

    /// check configuration is usable
    pub fn validate(&self) -> Result<()> {
        self.endpoint_url()?;

        if self.timeout_secs == 0 {
            return Err(MortgageError::InvalidConfiguration {
                message: "timeout must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RatesServiceConfig::default();
        assert_eq!(config.endpoint, DEFAULT_RATES_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let config = RatesServiceConfig::new("not a url");
        assert!(matches!(config.validate(), Err(MortgageError::InvalidConfiguration { .. })));

        let config = RatesServiceConfig::new("ftp://rates.example.com/q");
        assert!(matches!(config.validate(), Err(MortgageError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = RatesServiceConfig::new("http://localhost:8080/q").with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_config_uses_defaults() {
        let config: RatesServiceConfig =
            serde_json::from_str(r#"{ "endpoint": "http://localhost:8080/q" }"#).unwrap();

        assert_eq!(config.endpoint, "http://localhost:8080/q");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.referrer.as_deref(), Some(DEFAULT_REFERRER));
    }

    #[test]
    fn test_from_env_reads_overrides() {
        std::env::set_var(RATES_ENDPOINT_ENV, "http://localhost:9090/q");
        std::env::set_var(RATES_TIMEOUT_ENV, " 7 ");
        let config = RatesServiceConfig::from_env().unwrap();
        assert_eq!(config.endpoint, "http://localhost:9090/q");
        assert_eq!(config.timeout_secs, 7);

        std::env::set_var(RATES_TIMEOUT_ENV, "soon");
        let err = RatesServiceConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(RATES_TIMEOUT_ENV));

        std::env::remove_var(RATES_ENDPOINT_ENV);
        std::env::remove_var(RATES_TIMEOUT_ENV);
    }
}
