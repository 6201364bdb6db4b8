//! Transport layer for the UNHCR SDK.

pub mod http;

pub use http::HttpTransport;
