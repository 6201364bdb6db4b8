//! Main client for the UNHCR SDK.

use crate::api::*;
use crate::config::{normalize_base_url, ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::endpoint::Endpoint;
use crate::error::{UnhcrError, UnhcrResult};
use crate::query::Filter;
use crate::transport::HttpTransport;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Main client for the UNHCR Population Statistics API.
#[derive(Clone)]
pub struct UnhcrClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl UnhcrClient {
    /// Create a new client builder.
    pub fn builder() -> UnhcrClientBuilder {
        UnhcrClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> UnhcrResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch raw JSON from `endpoint` with `filter` applied.
    ///
    /// Issues exactly one GET. The configured default year is used only when
    /// the filter names no year.
    pub async fn fetch(&self, endpoint: Endpoint, filter: &Filter) -> UnhcrResult<Value> {
        let mut query = filter.query_pairs(endpoint);
        if filter.years.is_empty() {
            if let Some(year) = &self.config.default_year {
                query.push(("year[]", year.clone()));
            }
        }

        info!(endpoint = %endpoint, query = ?query, "Fetching UNHCR data");

        self.http
            .get_with_query(&endpoint.path(), &query)
            .await
            .inspect_err(|e| error!(endpoint = %endpoint, error = %e, "Error fetching UNHCR data"))
    }

    /// Get the population API.
    pub fn population(&self) -> PopulationApi<'_> {
        PopulationApi::new(self)
    }

    /// Get the demographics API.
    pub fn demographics(&self) -> DemographicsApi<'_> {
        DemographicsApi::new(self)
    }

    /// Get the asylum applications API.
    pub fn asylum_applications(&self) -> AsylumApplicationsApi<'_> {
        AsylumApplicationsApi::new(self)
    }

    /// Get the asylum decisions API.
    pub fn asylum_decisions(&self) -> AsylumDecisionsApi<'_> {
        AsylumDecisionsApi::new(self)
    }

    /// Get the solutions API.
    pub fn solutions(&self) -> SolutionsApi<'_> {
        SolutionsApi::new(self)
    }
}

/// Builder for creating an UnhcrClient.
pub struct UnhcrClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    default_year: Option<String>,
}

impl UnhcrClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            user_agent: None,
            default_year: None,
        }
    }

    /// Set the base URL of the API. Defaults to the public UNHCR endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the year used when a query names none.
    pub fn default_year(mut self, year: impl Into<String>) -> Self {
        self.default_year = Some(year.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> UnhcrResult<UnhcrClient> {
        let base_url_str = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(base_url_str)?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(UnhcrError::Config(format!(
                "base_url must be http or https, got {}",
                base_url.scheme()
            )));
        }

        let default_year = self
            .default_year
            .map(|y| y.trim().to_string())
            .filter(|y| !y.is_empty());

        let config = ClientConfig {
            base_url: normalize_base_url(base_url),
            timeout: self.timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            default_year,
        };

        UnhcrClient::from_config(config)
    }
}

impl Default for UnhcrClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
