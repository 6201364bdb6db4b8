//! HTTP transport layer for the UNHCR SDK.

use crate::config::ClientConfig;
use crate::error::{UnhcrError, UnhcrResult};
use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> UnhcrResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path.
    fn build_url(&self, path: &str) -> UnhcrResult<url::Url> {
        self.config
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(UnhcrError::InvalidUrl)
    }

    /// Send a request once and read the body as JSON.
    async fn execute<T: DeserializeOwned>(&self, request_builder: RequestBuilder) -> UnhcrResult<T> {
        let response = request_builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed");
            UnhcrError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned error status");
            return Err(UnhcrError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|source| UnhcrError::InvalidBody {
            status: status.as_u16(),
            source,
        })
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> UnhcrResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request with query");

        self.execute(self.client.get(url).query(query)).await
    }
}
