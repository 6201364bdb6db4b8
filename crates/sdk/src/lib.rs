//! # UNHCR SDK
//!
//! Rust client for the UNHCR Population Statistics API
//! (`https://api.unhcr.org/population/v1/`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use unhcr_sdk::{Filter, UnhcrClient, UnhcrResult};
//!
//! #[tokio::main]
//! async fn main() -> UnhcrResult<()> {
//!     let client = UnhcrClient::builder().build()?;
//!
//!     // Refugees from Syria hosted in Germany, 2022 and 2023
//!     let filter = Filter::new().coo("SYR").coa("DEU").year("2022,2023");
//!     let data = client.population().get(&filter).await?;
//!     println!("{}", data);
//!
//!     // RSD decisions broken down by country of asylum
//!     let decisions = client
//!         .asylum_decisions()
//!         .get(&Filter::new().coo("AFG").coa_all(true))
//!         .await?;
//!     println!("{}", decisions);
//!
//!     Ok(())
//! }
//! ```
//!
//! Each call issues exactly one GET and returns upstream JSON unchanged.
//! Failures (network, non-2xx status, non-JSON body) come back as
//! [`UnhcrError`]; nothing is retried.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod query;
pub mod summary;
pub mod transport;

// Re-export main client
pub use client::{UnhcrClient, UnhcrClientBuilder};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use endpoint::Endpoint;
pub use error::{UnhcrError, UnhcrResult};
pub use query::Filter;

// Re-export summary types
pub use summary::{
    AsylumStats, Country, CountryProfile, ProfileSide, RankedCountry, RefugeeCount, YearlySummary,
};
