//! Basic example walking through the common Parva calls.
//!
//! This example shows how to:
//! - Create a client with custom configuration
//! - Convert dates and fetch the panchanga
//! - Decode the envelope payload into a typed struct
//! - Read the metadata block (confidence, provenance, trace id)
//!
//! Run with: `cargo run --example basic_usage`
//! (expects a Parva server on http://localhost:8000/v5/api)

use parva_client::{Client, ResolveRequest};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Panchanga {
    tithi: String,
    nakshatra: String,
    yoga: String,
    karana: String,
    vara: String,
}

#[tokio::main]
async fn main() -> Result<(), parva_client::Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("parva_client=debug,basic_usage=info")
        .init();

    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .retries(2)
        .backoff(Duration::from_millis(300))
        .build()?;

    println!("=== Today ===");
    let today = client.today().await?;
    println!("data: {}", today.data);
    println!(
        "confidence: {} ({:.2})",
        today.meta.confidence.level, today.meta.confidence.score
    );
    println!();

    println!("=== Panchanga ===");
    let envelope = client.panchanga(Some("2025-01-15")).await?;
    let panchanga: Panchanga = envelope.decode()?;
    println!("tithi: {}", panchanga.tithi);
    println!("nakshatra: {}", panchanga.nakshatra);
    println!("boundary risk: {}", envelope.meta.uncertainty.boundary_risk);
    println!();

    println!("=== Upcoming festivals ===");
    let upcoming = client.upcoming(30).await?;
    println!("data: {}", upcoming.data);
    println!();

    println!("=== Resolve with trace verification ===");
    let resolved = client.resolve(&ResolveRequest::new("2026-10-21")).await?;
    println!("data: {}", resolved.data);
    if let Some(trace_id) = &resolved.meta.trace_id {
        let verification = client.verify_trace(trace_id).await?;
        println!("verification: {}", verification.data);
    }

    Ok(())
}
