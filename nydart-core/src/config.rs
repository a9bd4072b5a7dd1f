//! Client configuration.
//!
//! Loaded from environment variables with defaults matching a local
//! development setup (AI service on :5000, persistence service on :5001).

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{AdvisorError, Result};

pub const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:5000";
pub const DEFAULT_DB_SERVICE_URL: &str = "http://localhost:5001";
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_HEALTH_TTL: Duration = Duration::from_secs(30);
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// Analysis client configuration.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// AI analysis service base URL (default: http://localhost:5000)
    pub ai_service_url: String,
    /// Persistence service base URL (default: http://localhost:5001)
    pub db_service_url: String,
    /// Bearer credential issued by the auth service
    pub token: Option<String>,
    /// Client-side upload deadline (default: 30s)
    pub upload_timeout: Duration,
    /// How long a liveness probe result is reused (default: 30s)
    pub health_ttl: Duration,
    /// Page size for the remote history read (default: 10)
    pub history_limit: u32,
    /// Directory backing the local durable store
    pub store_dir: Option<PathBuf>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            ai_service_url: DEFAULT_AI_SERVICE_URL.to_string(),
            db_service_url: DEFAULT_DB_SERVICE_URL.to_string(),
            token: None,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
            health_ttl: DEFAULT_HEALTH_TTL,
            history_limit: DEFAULT_HISTORY_LIMIT,
            store_dir: None,
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let secs = |key: &str, fallback: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .map(Duration::from_secs)
                .unwrap_or(fallback)
        };

        let config = Self {
            ai_service_url: lookup("NYDART_AI_SERVICE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.ai_service_url),
            db_service_url: lookup("NYDART_DB_SERVICE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.db_service_url),
            token: lookup("NYDART_TOKEN").filter(|v| !v.trim().is_empty()),
            upload_timeout: secs("NYDART_UPLOAD_TIMEOUT_SECS", defaults.upload_timeout),
            health_ttl: secs("NYDART_HEALTH_TTL_SECS", defaults.health_ttl),
            history_limit: lookup("NYDART_HISTORY_LIMIT")
                .and_then(|v| v.trim().parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.history_limit),
            store_dir: lookup("NYDART_STORE_DIR").map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that both service URLs are absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("NYDART_AI_SERVICE_URL", &self.ai_service_url),
            ("NYDART_DB_SERVICE_URL", &self.db_service_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| AdvisorError::Config(format!("{name} is not a valid URL: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(AdvisorError::Config(format!(
                    "{name} must use http or https, got {}",
                    url.scheme()
                )));
            }
        }
        Ok(())
    }
}

/// Join a base URL and an absolute path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.ai_service_url, "http://localhost:5000");
        assert_eq!(config.db_service_url, "http://localhost:5001");
        assert_eq!(config.upload_timeout, Duration::from_secs(30));
        assert_eq!(config.health_ttl, Duration::from_secs(30));
        assert_eq!(config.history_limit, 10);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AdvisorConfig::from_lookup(lookup(&[
            ("NYDART_AI_SERVICE_URL", "https://ai.example.com"),
            ("NYDART_TOKEN", "abc"),
            ("NYDART_UPLOAD_TIMEOUT_SECS", "5"),
            ("NYDART_HISTORY_LIMIT", "25"),
        ]))
        .unwrap();
        assert_eq!(config.ai_service_url, "https://ai.example.com");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.upload_timeout, Duration::from_secs(5));
        assert_eq!(config.history_limit, 25);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = AdvisorConfig::from_lookup(lookup(&[
            ("NYDART_UPLOAD_TIMEOUT_SECS", "soon"),
            ("NYDART_HEALTH_TTL_SECS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.upload_timeout, DEFAULT_UPLOAD_TIMEOUT);
        assert_eq!(config.health_ttl, DEFAULT_HEALTH_TTL);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = AdvisorConfig::from_lookup(lookup(&[("NYDART_DB_SERVICE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Config(_)));

        let err = AdvisorConfig::from_lookup(lookup(&[("NYDART_AI_SERVICE_URL", "ftp://x")]))
            .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_endpoint_join() {
        assert_eq!(
            endpoint("http://localhost:5000/", "/health"),
            "http://localhost:5000/health"
        );
        assert_eq!(
            endpoint("http://localhost:5000", "/api/ai/analyze"),
            "http://localhost:5000/api/ai/analyze"
        );
    }
}
