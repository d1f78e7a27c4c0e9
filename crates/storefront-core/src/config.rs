//! Runtime Configuration
//!
//! Defaults are compiled in; the host page may override any field with a
//! JSON block.

use serde::Deserialize;
use thiserror::Error;

/// API base used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid storefront config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid storefront config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorefrontConfig {
    pub api_base_url: String,
    pub catalog_page_size: u32,
    pub review_page_size: u32,
    /// Page links shown around the current page
    pub pagination_window: u32,
    pub toast_timeout_ms: u32,
    /// `log` level name: error, warn, info, debug, trace
    pub log_level: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("STOREFRONT_API_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            catalog_page_size: 12,
            review_page_size: 5,
            pagination_window: 5,
            toast_timeout_ms: 4000,
            log_level: "info".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("apiBaseUrl must not be empty".to_string()));
        }
        if self.catalog_page_size == 0 || self.review_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive".to_string()));
        }
        Ok(())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = StorefrontConfig::from_json(r#"{"apiBaseUrl":"https://shop.example/api","catalogPageSize":24}"#)
            .unwrap();
        assert_eq!(config.api_base_url, "https://shop.example/api");
        assert_eq!(config.catalog_page_size, 24);
        assert_eq!(config.review_page_size, 5);
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(StorefrontConfig::from_json(r#"{"apiBaseUrl":""}"#).is_err());
        assert!(StorefrontConfig::from_json(r#"{"catalogPageSize":0}"#).is_err());
        assert!(StorefrontConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        let config = StorefrontConfig {
            log_level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
        let config = StorefrontConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }
}
