use anyhow::{bail, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://exercisedb.dev/api/v1";
pub const DEFAULT_MEDIA_URL: &str =
    "https://raw.githubusercontent.com/ExerciseDB/exercisedb-api/main/media";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogMode {
    FallbackOnly,
    Remote,
}

impl CatalogMode {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fallback" => Some(CatalogMode::FallbackOnly),
            "remote" => Some(CatalogMode::Remote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub mode: CatalogMode,
    pub base_url: String,
    pub media_url: String,
    pub api_key: Option<String>,
    pub list_timeout: Duration,
    pub item_timeout: Duration,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self> {
        let mode_value = env::var("CATALOG_MODE").unwrap_or_else(|_| "fallback".to_string());
        let Some(mode) = CatalogMode::from_str(&mode_value) else {
            bail!("CATALOG_MODE must be 'fallback' or 'remote', got '{}'", mode_value);
        };

        let list_timeout_secs = env::var("CATALOG_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15);

        Ok(CatalogConfig {
            mode,
            base_url: env::var("CATALOG_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            media_url: env::var("CATALOG_MEDIA_URL")
                .unwrap_or_else(|_| DEFAULT_MEDIA_URL.to_string()),
            api_key: env::var("CATALOG_API_KEY").ok().filter(|key| !key.is_empty()),
            list_timeout: Duration::from_secs(list_timeout_secs),
            item_timeout: Duration::from_secs(10),
        })
    }

    /// Remote configuration pointing at `base_url`, used by tests against a mock server.
    pub fn remote(base_url: impl Into<String>) -> Self {
        Self {
            mode: CatalogMode::Remote,
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            mode: CatalogMode::FallbackOnly,
            base_url: DEFAULT_BASE_URL.to_string(),
            media_url: DEFAULT_MEDIA_URL.to_string(),
            api_key: None,
            list_timeout: Duration::from_secs(15),
            item_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(CatalogMode::from_str("remote"), Some(CatalogMode::Remote));
        assert_eq!(CatalogMode::from_str(" Fallback "), Some(CatalogMode::FallbackOnly));
        assert_eq!(CatalogMode::from_str("both"), None);
    }

    #[test]
    fn test_remote_config_keeps_default_timeouts() {
        let config = CatalogConfig::remote("http://127.0.0.1:9999");
        assert_eq!(config.mode, CatalogMode::Remote);
        assert_eq!(config.list_timeout, Duration::from_secs(15));
        assert_eq!(config.item_timeout, Duration::from_secs(10));
    }
}
