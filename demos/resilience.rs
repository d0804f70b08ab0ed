//! Example demonstrating error handling, retries, and deadlines.
//!
//! This example shows how to:
//! - Match on the different error variants
//! - Distinguish transient from fatal failures
//! - Bound a whole call (attempts + backoff sleeps) with a deadline
//!
//! Run with: `cargo run --example resilience`

use parva_client::{ApiRequest, Client, Error};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("parva_client=info")
        .init();

    let client = Client::builder()
        .retries(3)
        .backoff(Duration::from_millis(500))
        .jitter(true)
        .build()?;

    println!("=== Example 1: Handling API errors ===");
    // An unknown trace id surfaces the server's 404 unmodified, without
    // any retry.
    match client.explain_trace("no-such-trace").await {
        Ok(envelope) => println!("Success: {}", envelope.data),
        Err(Error::Api { status, body }) => {
            println!("API error!");
            println!("  Status: {}", status);
            println!("  Is client error (4xx): {}", status.is_client_error());
            println!("  Body: {}", body);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 2: Transient vs fatal ===");
    match client.today().await {
        Ok(envelope) => println!("Success: {}", envelope.data),
        Err(e) => {
            println!("Failed: {}", e);
            println!("  transient (was retried): {}", e.is_transient());
            if let Some(status) = e.status() {
                println!("  status: {}", status);
            }
        }
    }
    println!();

    println!("=== Example 3: Deadline over the whole retry sequence ===");
    let result = client
        .call(&ApiRequest::new("/calendar/today").with_deadline(Duration::from_secs(2)))
        .await;
    match result {
        Ok(envelope) => println!("Answered in time: {}", envelope.data),
        Err(Error::DeadlineExceeded) => {
            println!("Gave up after two seconds instead of finishing all retries");
        }
        Err(e) => println!("Other error: {}", e),
    }

    Ok(())
}
