// MCP server: JSON-RPC dispatch and the stdio loop

use crate::protocol::*;
use crate::resources::{ResourceCatalog, ResourceError};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Decoder, FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

/// Longest request line accepted on stdio.
pub const MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

const INSTRUCTIONS: &str = "Query UNHCR population statistics. Use coo for people FROM a country \
and coa for people IN a country (ISO3 codes). Omit year for the latest available data.";

pub struct McpServer {
    registry: ToolRegistry,
    resources: Option<ResourceCatalog>,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            resources: None,
            info: ServerInfo {
                name: "unhcr-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn with_resources(mut self, resources: ResourceCatalog) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes.
    pub async fn start(&self) -> Result<()> {
        info!("MCP server listening on stdio ({} tools)", self.registry.len());
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Read one message per line from `reader`, write one response per line to `writer`.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(reader, RequestLines::new(MAX_LINE_LENGTH));

        while let Some(frame) = lines.next().await {
            let response = match frame.context("Failed to read request line")? {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_message(&line).await,
                Err(e) => {
                    warn!("Undecodable request line: {}", e);
                    Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error(e)))
                }
            };

            if let Some(response) = response {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer
                    .write_all(out.as_bytes())
                    .await
                    .context("Failed to write response")?;
                writer.flush().await?;
            }
        }

        info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw message. `None` when no reply is due.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error(e)))
            }
        }
    }

    pub async fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        if value.is_array() {
            return Some(JsonRpcResponse::error(
                Value::Null,
                JsonRpcError::invalid_request("Batch requests are not supported"),
            ));
        }

        // `"id": null` is still a request; only a missing id marks a notification
        let id = value.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(mut request) => {
                if request.id.is_none() {
                    request.id = id;
                }
                self.handle_request(request).await
            }
            Err(e) => Some(JsonRpcResponse::error(
                id.unwrap_or(Value::Null),
                JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
            )),
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        debug!("Request {}: {}", id, request.method);
        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => to_result(&ListToolsResult {
                tools: self.registry.list_schemas(),
            }),
            "tools/call" => self.call_tool(request.params).await,
            "resources/list" => to_result(&ListResourcesResult {
                resources: self.resources.as_ref().map(|r| r.list()).unwrap_or_default(),
            }),
            "resources/templates/list" => to_result(&ListResourceTemplatesResult {
                resource_templates: self
                    .resources
                    .as_ref()
                    .map(|r| r.templates())
                    .unwrap_or_default(),
            }),
            "resources/read" => self.read_resource(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = match params {
            Some(params) => parse_params(params)?,
            None => InitializeParams::default(),
        };

        if let Some(client) = &params.client_info {
            info!("Client connected: {} {}", client.name, client.version);
        }

        to_result(&InitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
                resources: self.resources.as_ref().map(|_| ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
            instructions: Some(INSTRUCTIONS.to_string()),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let mut params: CallToolParams = parse_params(params.unwrap_or(Value::Null))?;
        if params.arguments.is_null() {
            params.arguments = json!({});
        }

        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)))?;

        info!("Calling tool {}", params.name);
        let result = match tool.execute(params.arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool {} failed: {:#}", params.name, e);
                CallToolResult::error(format!("{:#}", e))
            }
        };
        to_result(&result)
    }

    async fn read_resource(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: ReadResourceParams = parse_params(params.unwrap_or(Value::Null))?;
        let resources = self
            .resources
            .as_ref()
            .ok_or_else(|| JsonRpcError::resource_not_found(&params.uri))?;

        match resources.read(&params.uri).await {
            Ok(result) => to_result(&result),
            Err(ResourceError::NotFound(uri)) => Err(JsonRpcError::resource_not_found(&uri)),
            Err(ResourceError::Upstream(e)) => {
                warn!("Resource {} failed: {}", params.uri, e);
                Err(JsonRpcError::internal_error(format!(
                    "Failed to read {}: {}",
                    params.uri, e
                )))
            }
        }
    }
}

/// Newline-delimited frames where a bad line (invalid UTF-8, too long) is
/// yielded as an item. `FramedRead` ends the stream after a decoder error,
/// so only read failures surface as `Err`.
struct RequestLines(LinesCodec);

impl RequestLines {
    fn new(max_length: usize) -> Self {
        Self(LinesCodec::new_with_max_length(max_length))
    }

    fn frame(
        decoded: Result<Option<String>, LinesCodecError>,
    ) -> std::io::Result<Option<Result<String, LinesCodecError>>> {
        match decoded {
            Ok(line) => Ok(line.map(Ok)),
            Err(e) => Ok(Some(Err(e))),
        }
    }
}

impl Decoder for RequestLines {
    type Item = Result<String, LinesCodecError>;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Self::frame(self.0.decode(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Self::frame(self.0.decode_eof(src))
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, JsonRpcError> {
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
