use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

pub const BASE_URL_ENV: &str = "PROFILE_API_BASE_URL";
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base url '{0}': {1}")]
    InvalidBaseUrl(String, url::ParseError),
    #[error("Unsupported scheme in base url: {0}")]
    UnsupportedScheme(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&trimmed)
            .map_err(|e| ConfigError::InvalidBaseUrl(raw.clone(), e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(raw));
        }
        Ok(Self { base_url: trimmed })
    }

    /// Reads `PROFILE_API_BASE_URL`, falling back to the default when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value),
            _ => Ok(Self::default()),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Installs the `env_logger` backend. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

// ==========================================
// Collaborators
// ==========================================

/// Source of the API token for the `Authorization` header.
pub trait TokenProvider: Send + Sync {
    fn api_token(&self) -> Option<String>;
}

/// Client-side router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Token held in memory, swapped on login/logout.
#[derive(Debug, Default)]
pub struct MemoryTokenStore(Mutex<Option<String>>);

impl MemoryTokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self(Mutex::new(token))
    }

    pub fn set(&self, token: Option<String>) {
        if let Ok(mut guard) = self.0.lock() {
            *guard = token;
        }
    }
}

impl TokenProvider for MemoryTokenStore {
    fn api_token(&self) -> Option<String> {
        self.0.lock().ok().and_then(|t| t.clone())
    }
}

/// Remembers every path it was asked to navigate to.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    visited: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn current(&self) -> Option<String> {
        self.visited().last().cloned()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        log::info!("Navigating to {}", path);
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(path.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = ApiConfig::new("https://api.example.org/").unwrap();
        assert_eq!(config.base_url, "https://api.example.org");
        assert_eq!(
            config.endpoint("/api/v1/profiles/3/"),
            "https://api.example.org/api/v1/profiles/3/"
        );
    }

    #[test]
    fn test_config_rejects_bad_urls() {
        assert!(matches!(ApiConfig::new("not a url"), Err(ConfigError::InvalidBaseUrl(..))));
        assert!(matches!(
            ApiConfig::new("ftp://example.org"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var(BASE_URL_ENV, "http://profiles.internal:9000/");
        let config = ApiConfig::from_env().unwrap();
        std::env::remove_var(BASE_URL_ENV);
        assert_eq!(config.base_url, "http://profiles.internal:9000");
        assert_eq!(ApiConfig::from_env().unwrap(), ApiConfig::default());
    }

    #[test]
    fn test_memory_token_store() {
        let store = MemoryTokenStore::default();
        assert_eq!(store.api_token(), None);
        store.set(Some("abc".into()));
        assert_eq!(store.api_token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_history_navigator() {
        let nav = HistoryNavigator::default();
        nav.navigate("/a");
        nav.navigate("/b");
        assert_eq!(nav.visited(), vec!["/a".to_string(), "/b".to_string()]);
        assert_eq!(nav.current().as_deref(), Some("/b"));
    }
}
