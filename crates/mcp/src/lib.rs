// MCP (Model Context Protocol) server for the UNHCR Population Statistics API
// Serves query tools and Markdown resources to agent clients over stdio or HTTP

pub mod config;
pub mod http;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use server::McpServer;
