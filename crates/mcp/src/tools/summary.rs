// Summary tools computed from population data

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::list;
use crate::tools::query::upstream_error;
use crate::tools::{json_schema_object, json_schema_string, json_schema_year, Tool};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use unhcr_sdk::UnhcrClient;

fn no_data() -> CallToolResult {
    CallToolResult::json_error(json!({"error": "No data found", "status": "error"}))
}

fn summary_result<T: Serialize>(summary: Option<T>) -> Result<CallToolResult> {
    match summary {
        Some(summary) => Ok(CallToolResult::json(serde_json::to_value(summary)?)),
        None => Ok(no_data()),
    }
}

/// Tool to total refugees from one country of origin
pub struct RefugeeCountTool {
    client: Arc<UnhcrClient>,
}

impl RefugeeCountTool {
    pub fn new(client: Arc<UnhcrClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct RefugeeCountArgs {
    coo: String,
    #[serde(default, deserialize_with = "list")]
    coa: Option<String>,
    #[serde(default, deserialize_with = "list")]
    year: Option<String>,
}

#[async_trait::async_trait]
impl Tool for RefugeeCountTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_refugee_count".to_string(),
            description: "Get the total refugee count for a country of origin, grouped by year".to_string(),
            input_schema: json_schema_object(
                json!({
                    "coo": json_schema_string("Country of origin (ISO3 code)"),
                    "coa": json_schema_string("Optional country of asylum filter (ISO3 code)"),
                    "year": json_schema_year("Optional year filter (comma-separated for multiple years)")
                }),
                vec!["coo"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: RefugeeCountArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_refugee_count")?;

        let result = self
            .client
            .population()
            .refugee_count(&args.coo, args.coa.as_deref(), args.year.as_deref())
            .await;

        match result {
            Ok(count) => summary_result(count),
            Err(e) => Ok(upstream_error(&e)),
        }
    }
}

/// Tool to summarise refugees hosted by one country of asylum
pub struct AsylumStatsTool {
    client: Arc<UnhcrClient>,
}

impl AsylumStatsTool {
    pub fn new(client: Arc<UnhcrClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct AsylumStatsArgs {
    coa: String,
    #[serde(default, deserialize_with = "list")]
    year: Option<String>,
}

#[async_trait::async_trait]
impl Tool for AsylumStatsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_asylum_stats".to_string(),
            description: "Get refugees hosted by a country of asylum, broken down by country of origin and year"
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "coa": json_schema_string("Country of asylum (ISO3 code)"),
                    "year": json_schema_year("Optional year filter (comma-separated for multiple years)")
                }),
                vec!["coa"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: AsylumStatsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_asylum_stats")?;

        match self
            .client
            .population()
            .asylum_stats(&args.coa, args.year.as_deref())
            .await
        {
            Ok(stats) => summary_result(stats),
            Err(e) => Ok(upstream_error(&e)),
        }
    }
}
