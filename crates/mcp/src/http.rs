// HTTP transport: JSON-RPC over POST plus a health probe

use crate::server::McpServer;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Start the HTTP server
pub async fn serve(addr: SocketAddr, server: Arc<McpServer>) -> Result<()> {
    let app = router(server);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("MCP HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/", get(health_check).post(rpc))
        .route("/health", get(health_check))
        .route("/mcp", post(rpc))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(CorsLayer::permissive())
        .with_state(server)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "server": "unhcr-mcp",
    }))
}

async fn rpc(State(server): State<Arc<McpServer>>, body: Bytes) -> Response {
    let message: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Rejected HTTP request body: {}", e);
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid json"}))).into_response();
        }
    };

    match server.handle_value(tool_shorthand(&server, message)).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// `{"method": "<tool name>", "params": {...}}` becomes a `tools/call`.
fn tool_shorthand(server: &McpServer, mut message: Value) -> Value {
    let Some(method) = message.get("method").and_then(Value::as_str) else {
        return message;
    };
    if !server.registry().contains(method) {
        return message;
    }

    let name = method.to_string();
    let arguments = match message.get_mut("params").map(Value::take) {
        Some(Value::Null) | None => json!({}),
        Some(params) => params,
    };
    message["method"] = json!("tools/call");
    message["params"] = json!({ "name": name, "arguments": arguments });
    message
}
