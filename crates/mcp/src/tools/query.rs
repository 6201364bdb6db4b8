// Query tools: one per UNHCR endpoint, relaying upstream JSON unchanged

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::QueryArgs;
use crate::tools::{json_schema_boolean, json_schema_object, json_schema_string, json_schema_year, Tool};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use unhcr_sdk::{Endpoint, UnhcrClient, UnhcrError};

const COO_FILTER: &str = "Country of origin filter (ISO3 code, comma-separated for multiple)";
const COA_FILTER: &str = "Country of asylum filter (ISO3 code, comma-separated for multiple)";
const YEAR_FILTER: &str = "Year filter (comma-separated for multiple years). Omit for the latest year";

/// Tool that queries one UNHCR endpoint with the standard filters
pub struct QueryTool {
    client: Arc<UnhcrClient>,
    endpoint: Endpoint,
    name: &'static str,
    description: &'static str,
    coo_all_hint: &'static str,
    coa_all_hint: &'static str,
}

impl QueryTool {
    pub fn population(client: Arc<UnhcrClient>) -> Self {
        Self {
            client,
            endpoint: Endpoint::Population,
            name: "get_population_data",
            description: "Get forcibly displaced populations like refugees, asylum seekers, stateless persons data from UNHCR. \
                Use coo for questions about people FROM a country and coa for people IN a country.",
            coo_all_hint: "Set to true when breaking down results by ORIGIN country",
            coa_all_hint: "Set to true when breaking down results by ASYLUM country",
        }
    }

    pub fn demographics(client: Arc<UnhcrClient>) -> Self {
        Self {
            client,
            endpoint: Endpoint::Demographics,
            name: "get_demographics_data",
            description: "Get forcibly displaced populations demographics data from UNHCR. \
                It shows breakdown by age and sex when available.",
            coo_all_hint: "Set to true when breaking down results by ORIGIN country",
            coa_all_hint: "Set to true when breaking down results by ASYLUM country",
        }
    }

    pub fn rsd_applications(client: Arc<UnhcrClient>) -> Self {
        Self {
            client,
            endpoint: Endpoint::AsylumApplications,
            name: "get_rsd_applications",
            description: "Get Refugee Status Determination (RSD) application data from UNHCR.",
            coo_all_hint: "Set to true when analyzing the ORIGIN COUNTRIES of asylum seekers",
            coa_all_hint: "Set to true when analyzing the ASYLUM COUNTRIES where applications were filed",
        }
    }

    pub fn rsd_decisions(client: Arc<UnhcrClient>) -> Self {
        Self {
            client,
            endpoint: Endpoint::AsylumDecisions,
            name: "get_rsd_decisions",
            description: "Get Refugee Status Determination (RSD) decision data from UNHCR.",
            coo_all_hint: "Set to true when analyzing decisions breakdown BY NATIONALITY",
            coa_all_hint: "Set to true when analyzing decisions breakdown BY COUNTRY",
        }
    }

    pub fn solutions(client: Arc<UnhcrClient>) -> Self {
        Self {
            client,
            endpoint: Endpoint::Solutions,
            name: "get_solutions",
            description: "Get figures on durable solutions from UNHCR which includes refugee returnees (returned_refugees), \
                resettlement, naturalisation, returned IDPs (returned_idps).",
            coo_all_hint: "Set to true when analyzing solutions breakdown BY NATIONALITY",
            coa_all_hint: "Set to true when analyzing solutions breakdown BY COUNTRY",
        }
    }

    /// One tool per endpoint.
    pub fn all(client: Arc<UnhcrClient>) -> Vec<Self> {
        vec![
            Self::population(client.clone()),
            Self::demographics(client.clone()),
            Self::rsd_applications(client.clone()),
            Self::rsd_decisions(client.clone()),
            Self::solutions(client),
        ]
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }
}

#[async_trait::async_trait]
impl Tool for QueryTool {
    fn schema(&self) -> ToolSchema {
        let mut properties = json!({
            "coo": json_schema_string(COO_FILTER),
            "coa": json_schema_string(COA_FILTER),
            "year": json_schema_year(YEAR_FILTER),
            "coo_all": json_schema_boolean(self.coo_all_hint),
            "coa_all": json_schema_boolean(self.coa_all_hint),
        });
        if self.endpoint.supports_pop_type() {
            properties["pop_type"] = json_schema_boolean(
                "Set to true when asked about specific population types (e.g., refugees, asylum seekers, stateless persons)",
            );
        }

        ToolSchema {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: json_schema_object(properties, vec![]),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: QueryArgs = serde_json::from_value(arguments)
            .with_context(|| format!("Invalid arguments for {}", self.name))?;

        let filter = args.into_filter();
        match self.client.fetch(self.endpoint, &filter).await {
            Ok(payload) => Ok(CallToolResult::json(payload)),
            Err(e) => Ok(upstream_error(&e)),
        }
    }
}

/// Tool result for a failed upstream call.
///
/// `{"error": <message>, "status": "error", "http_status": <code>}`, the code
/// only when a response was received.
pub fn upstream_error(err: &UnhcrError) -> CallToolResult {
    let mut payload = json!({
        "error": err.to_string(),
        "status": "error",
    });
    if let Some(status) = err.status() {
        payload["http_status"] = json!(status);
    }
    CallToolResult::json_error(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> Arc<UnhcrClient> {
        Arc::new(UnhcrClient::builder().base_url(server.uri()).build().unwrap())
    }

    async fn mock_json(server: &MockServer, endpoint: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/", endpoint)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn sent_query(server: &MockServer) -> Vec<(String, String)> {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_names_and_endpoints() {
        let client = Arc::new(UnhcrClient::builder().build().unwrap());
        let tools: Vec<_> = QueryTool::all(client)
            .into_iter()
            .map(|t| (t.schema().name, t.endpoint()))
            .collect();

        assert_eq!(
            tools,
            vec![
                ("get_population_data".to_string(), Endpoint::Population),
                ("get_demographics_data".to_string(), Endpoint::Demographics),
                ("get_rsd_applications".to_string(), Endpoint::AsylumApplications),
                ("get_rsd_decisions".to_string(), Endpoint::AsylumDecisions),
                ("get_solutions".to_string(), Endpoint::Solutions),
            ]
        );
    }

    #[test]
    fn test_pop_type_only_in_demographics_schema() {
        let client = Arc::new(UnhcrClient::builder().build().unwrap());
        for tool in QueryTool::all(client) {
            let schema = tool.schema();
            let props = &schema.input_schema["properties"];
            assert!(props.get("coo").is_some());
            assert!(props.get("coa_all").is_some());
            assert_eq!(
                props.get("pop_type").is_some(),
                schema.name == "get_demographics_data",
                "{}",
                schema.name
            );
            assert_eq!(schema.input_schema["required"], json!([]));
        }
    }

    #[tokio::test]
    async fn test_population_payload_unchanged() {
        let server = MockServer::start().await;
        mock_json(&server, "population", 200, json!({"items": []})).await;

        let tool = QueryTool::population(client_for(&server).await);
        let result = tool.execute(json!({})).await.unwrap();

        assert_eq!(result.is_error, None);
        assert_eq!(result.structured_content, Some(json!({"items": []})));
        let text: Value = serde_json::from_str(result.content[0].as_text()).unwrap();
        assert_eq!(text, json!({"items": []}));

        assert_eq!(
            sent_query(&server).await,
            vec![("cf_type".to_string(), "ISO".to_string())]
        );
    }

    #[tokio::test]
    async fn test_rsd_decisions_500_is_error_value() {
        let server = MockServer::start().await;
        mock_json(&server, "asylum-decisions", 500, json!({"message": "Internal Server Error"})).await;

        let tool = QueryTool::rsd_decisions(client_for(&server).await);
        let result = tool.execute(json!({"coo": "SYR"})).await.unwrap();

        assert_eq!(result.is_error, Some(true));
        let payload = result.structured_content.unwrap();
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["http_status"], 500);
        assert!(payload["error"].as_str().unwrap().contains("500"));

        assert!(sent_query(&server)
            .await
            .contains(&("coo".to_string(), "SYR".to_string())));
    }

    #[tokio::test]
    async fn test_coo_all_serialization() {
        let server = MockServer::start().await;
        mock_json(&server, "solutions", 200, json!({"items": []})).await;

        let tool = QueryTool::solutions(client_for(&server).await);
        tool.execute(json!({"coo_all": true, "coa_all": false}))
            .await
            .unwrap();

        let query = sent_query(&server).await;
        assert!(query.contains(&("coo_all".to_string(), "true".to_string())));
        assert!(!query.iter().any(|(k, _)| k == "coa_all"));
    }

    #[tokio::test]
    async fn test_demographics_pop_type() {
        for (pop_type, expected) in [(true, vec!["true".to_string()]), (false, vec![])] {
            let server = MockServer::start().await;
            mock_json(&server, "demographics", 200, json!({"items": []})).await;

            let tool = QueryTool::demographics(client_for(&server).await);
            tool.execute(json!({"pop_type": pop_type})).await.unwrap();

            let values: Vec<String> = sent_query(&server)
                .await
                .into_iter()
                .filter(|(k, _)| k == "pop_type")
                .map(|(_, v)| v)
                .collect();
            assert_eq!(values, expected);
        }
    }

    #[tokio::test]
    async fn test_pop_type_ignored_outside_demographics() {
        let server = MockServer::start().await;
        mock_json(&server, "population", 200, json!({"items": []})).await;

        let tool = QueryTool::population(client_for(&server).await);
        tool.execute(json!({"pop_type": true})).await.unwrap();

        assert!(!sent_query(&server).await.iter().any(|(k, _)| k == "pop_type"));
    }

    #[tokio::test]
    async fn test_multi_value_inputs() {
        let server = MockServer::start().await;
        mock_json(&server, "asylum-applications", 200, json!({"items": []})).await;

        let tool = QueryTool::rsd_applications(client_for(&server).await);
        tool.execute(json!({"coo": "SYR,AFG,IRQ", "year": "2021, 2022"}))
            .await
            .unwrap();

        let query = sent_query(&server).await;
        let years: Vec<_> = query.iter().filter(|(k, _)| k == "year[]").collect();
        assert_eq!(years.len(), 2);
        let coo = query.iter().find(|(k, _)| k == "coo").unwrap();
        assert_eq!(coo.1.split(',').count(), 3);
    }

    #[tokio::test]
    async fn test_non_json_body_is_error_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let tool = QueryTool::solutions(client_for(&server).await);
        let result = tool.execute(json!({})).await.unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.structured_content.unwrap()["http_status"], 200);
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_errors() {
        let client = Arc::new(UnhcrClient::builder().build().unwrap());
        let tool = QueryTool::population(client);

        let err = tool.execute(json!({"coo_all": "perhaps"})).await.unwrap_err();
        assert!(err.to_string().contains("get_population_data"));
    }
}
