// Standalone MCP server binary

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use unhcr_mcp::config::{ConfigOverrides, McpConfig};
use unhcr_mcp::resources::ResourceCatalog;
use unhcr_mcp::server::McpServer;
use unhcr_mcp::tools::{register_unhcr_tools, ToolRegistry};

#[derive(Parser, Debug)]
#[command(name = "unhcr-mcp")]
#[command(about = "MCP server for UNHCR population statistics", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "unhcr-mcp.toml")]
    config: PathBuf,

    /// Serve JSON-RPC over HTTP instead of stdio
    #[arg(long)]
    http: bool,

    /// Host to bind to in HTTP mode
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to listen on in HTTP mode
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// UNHCR API base URL
    #[arg(long, env = "UNHCR_API_BASE_URL")]
    base_url: Option<String>,

    /// Year used when a query names none
    #[arg(long, env = "UNHCR_DEFAULT_YEAR")]
    default_year: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "UNHCR_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries JSON-RPC, logs go to stderr
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "unhcr_mcp=info,unhcr_sdk=info".into());
    if args.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    tracing::info!("UNHCR MCP Server starting...");

    let config = McpConfig::load(&args.config)?.with_overrides(ConfigOverrides {
        base_url: args.base_url,
        timeout_secs: args.timeout_secs,
        default_year: args.default_year,
        host: args.host,
        port: args.port,
    });

    let client = Arc::new(config.build_client()?);
    tracing::info!("Upstream API: {}", client.config().base_url);

    // Create tool registry
    let mut registry = ToolRegistry::new();
    register_unhcr_tools(&mut registry, client.clone());
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry).with_resources(ResourceCatalog::new(client));

    if args.http {
        unhcr_mcp::http::serve(config.bind_addr()?, Arc::new(server)).await?;
    } else {
        server.start().await?;
    }

    Ok(())
}
