//! Configuration types for the UNHCR SDK.

use std::time::Duration;
use url::Url;

/// Base URL of the public UNHCR Population Statistics API.
pub const DEFAULT_BASE_URL: &str = "https://api.unhcr.org/population/v1/";

/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("unhcr-sdk/", env!("CARGO_PKG_VERSION"));

/// Configuration for the UNHCR client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API. Always ends with a `/`.
    pub base_url: Url,
    /// Request timeout. `None` leaves the HTTP client default in place.
    pub timeout: Option<Duration>,
    /// User agent header value.
    pub user_agent: String,
    /// Year sent when a query names no year. `None` lets upstream pick.
    pub default_year: Option<String>,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_year: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let url = Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL");
        Self::new(url)
    }
}

/// Endpoint paths are joined onto the base, so the base must end in `/` or
/// its last segment would be replaced.
pub(crate) fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        assert!(config.default_year.is_none());
        assert!(config.user_agent.starts_with("unhcr-sdk/"));
    }

    #[test]
    fn test_client_config_adds_trailing_slash() {
        let url = Url::parse("https://example.com/population/v1").unwrap();
        let config = ClientConfig::new(url);

        assert_eq!(config.base_url.as_str(), "https://example.com/population/v1/");
    }

    #[test]
    fn test_client_config_keeps_trailing_slash() {
        let url = Url::parse("http://localhost:8080/").unwrap();
        let config = ClientConfig::new(url);

        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
    }
}
