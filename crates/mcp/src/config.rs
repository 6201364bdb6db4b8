// Server configuration: TOML file with CLI/env overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;
use unhcr_sdk::{UnhcrClient, DEFAULT_BASE_URL};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Year applied when a query names none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    concat!("unhcr-mcp/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
            default_year: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Values taken from the command line or environment, applied over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub default_year: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl McpConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        if !config_path.exists() {
            tracing::info!("Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read configuration file {}", config_path.display()))?;
        toml::from_str(&content).context("Failed to parse configuration file")
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.upstream.base_url = base_url;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.upstream.timeout_secs = Some(timeout);
        }
        if let Some(year) = overrides.default_year {
            self.upstream.default_year = Some(year);
        }
        if let Some(host) = overrides.host {
            self.http.host = host;
        }
        if let Some(port) = overrides.port {
            self.http.port = port;
        }
        self
    }

    pub fn build_client(&self) -> Result<UnhcrClient> {
        let upstream = &self.upstream;
        let mut builder = UnhcrClient::builder()
            .base_url(upstream.base_url.as_str())
            .user_agent(upstream.user_agent.as_str());
        if let Some(secs) = upstream.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(year) = &upstream.default_year {
            builder = builder.default_year(year.as_str());
        }
        builder.build().context("Failed to create UNHCR client")
    }

    /// Listen address; `host` may be an IP literal or a resolvable name.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let HttpConfig { host, port } = &self.http;
        (host.as_str(), *port)
            .to_socket_addrs()
            .with_context(|| format!("Invalid listen address {}:{}", host, port))?
            .next()
            .with_context(|| format!("No address found for {}", host))
    }
}
