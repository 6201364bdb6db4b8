//! Basic SDK usage example.
//!
//! Queries the public UNHCR API for a handful of figures.
//!
//! Run with: cargo run --example basic_usage

use std::time::Duration;
use unhcr_sdk::{Filter, UnhcrClient, UnhcrResult};

#[tokio::main]
async fn main() -> UnhcrResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let client = UnhcrClient::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    println!("Refugees from Ukraine in 2023...");
    match client.population().refugee_count("UKR", None, Some("2023")).await? {
        Some(count) => println!("  Total: {}", count.total_refugees),
        None => println!("  No data found"),
    }

    println!("\nTop asylum countries in 2023...");
    if let Some(summary) = client.population().yearly_summary("2023", 5).await? {
        for country in &summary.top_asylums {
            println!("  {}: {}", country.name, country.refugees);
        }
    }

    println!("\nRSD decisions on Afghan applicants, by country of asylum...");
    let decisions = client
        .asylum_decisions()
        .get(&Filter::new().coo("AFG").year(2023).coa_all(true))
        .await?;
    let rows = decisions["items"].as_array().map(Vec::len).unwrap_or(0);
    println!("  {} rows", rows);

    Ok(())
}
