//! Refugee Status Determination API endpoints.

use crate::client::UnhcrClient;
use crate::endpoint::Endpoint;
use crate::error::UnhcrResult;
use crate::query::Filter;
use serde_json::Value;

/// RSD applications API.
pub struct AsylumApplicationsApi<'a> {
    client: &'a UnhcrClient,
}

impl<'a> AsylumApplicationsApi<'a> {
    pub(crate) fn new(client: &'a UnhcrClient) -> Self {
        Self { client }
    }

    /// Get asylum applications lodged.
    pub async fn get(&self, filter: &Filter) -> UnhcrResult<Value> {
        self.client.fetch(Endpoint::AsylumApplications, filter).await
    }
}

/// RSD decisions API.
pub struct AsylumDecisionsApi<'a> {
    client: &'a UnhcrClient,
}

impl<'a> AsylumDecisionsApi<'a> {
    pub(crate) fn new(client: &'a UnhcrClient) -> Self {
        Self { client }
    }

    /// Get decisions taken on asylum applications.
    pub async fn get(&self, filter: &Filter) -> UnhcrResult<Value> {
        self.client.fetch(Endpoint::AsylumDecisions, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_applications_and_decisions_hit_their_paths() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/asylum-applications/"))
            .and(query_param("coo", "SYR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"kind": "applications"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/asylum-decisions/"))
            .and(query_param("coo", "SYR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"kind": "decisions"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = UnhcrClient::builder().base_url(server.uri()).build().unwrap();
        let filter = Filter::new().coo("SYR");

        let applications = client.asylum_applications().get(&filter).await.unwrap();
        let decisions = client.asylum_decisions().get(&filter).await.unwrap();

        assert_eq!(applications["kind"], "applications");
        assert_eq!(decisions["kind"], "decisions");
    }
}
