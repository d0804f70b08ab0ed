//! # parva-client - Rust client for the Parva calendar API
//!
//! A typed, retry-aware client for the Parva calendar API: Gregorian ↔
//! Bikram Sambat conversion, festival calculation, panchanga computation,
//! and provenance verification. All calendrical logic lives server-side;
//! this crate handles request building, bounded retries with exponential
//! backoff, and decoding of the response envelope.
//!
//! ## Quick Start
//!
//! ```no_run
//! use parva_client::{Client, ResolveRequest};
//! use serde::Deserialize;
//! use std::time::Duration;
//!
//! #[derive(Deserialize)]
//! struct Panchanga {
//!     tithi: String,
//!     nakshatra: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), parva_client::Error> {
//!     let client = Client::builder()
//!         .base_url("https://parva.dev/v5/api")?
//!         .timeout(Duration::from_secs(10))
//!         .retries(3)
//!         .build()?;
//!
//!     // Every operation returns an Envelope: the payload plus a metadata
//!     // block describing confidence, provenance, and policy context.
//!     let envelope = client.panchanga(Some("2025-01-15")).await?;
//!     let panchanga: Panchanga = envelope.decode()?;
//!     println!("tithi: {}, nakshatra: {}", panchanga.tithi, panchanga.nakshatra);
//!     println!("confidence: {} ({:.2})",
//!         envelope.meta.confidence.level,
//!         envelope.meta.confidence.score);
//!
//!     // Profile-aware resolution with a retrievable computation trace.
//!     let resolved = client.resolve(&ResolveRequest::new("2026-10-21")).await?;
//!     if let Some(trace_id) = &resolved.meta.trace_id {
//!         let verification = client.verify_trace(trace_id).await?;
//!         println!("verification: {}", verification.data);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed envelope responses** - Every call returns an [`Envelope`]:
//!   an opaque JSON payload decoded on demand via [`Envelope::decode`],
//!   plus a [`ResponseMeta`] block (confidence, method, provenance,
//!   uncertainty, trace id, policy)
//! - **Bounded retries** - Transient failures (network errors, 5xx) are
//!   retried with exponential backoff; 4xx responses fail immediately
//! - **Legacy compatibility** - Servers that answer with bare JSON instead
//!   of the envelope shape are handled transparently: the whole body
//!   becomes the payload and a sentinel-valued metadata block is attached
//! - **Cancellable calls** - A per-request deadline bounds the whole retry
//!   sequence, backoff sleeps included
//! - **Structured logging** - Request attempts, retries, and failures are
//!   logged with `tracing`
//! - **Connection pooling** - One [`Client`] is cheap to clone and safe to
//!   share across tasks
//!
//! ## Retry behavior
//!
//! A call is attempted up to `retries + 1` times. Network-level failures
//! and 5xx responses sleep `backoff * 2^attempt` and try again; when
//! attempts run out the last error is returned with its status and body
//! intact. 4xx responses and undecodable bodies are never retried.
//!
//! ```no_run
//! use parva_client::{ApiRequest, Client, Error};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Error> {
//! let client = Client::new()?;
//!
//! // Bound the whole call (attempts + backoff sleeps) to two seconds.
//! let result = client
//!     .call(
//!         &ApiRequest::new("/calendar/today").with_deadline(Duration::from_secs(2)),
//!     )
//!     .await;
//!
//! match result {
//!     Ok(envelope) => println!("{}", envelope.data),
//!     Err(Error::DeadlineExceeded) => eprintln!("gave up after two seconds"),
//!     Err(Error::Api { status, body }) => eprintln!("API {}: {}", status, body),
//!     Err(e) => eprintln!("{}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoints;
mod envelope;
mod error;
pub mod request;
pub mod retry;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use endpoints::{ResolveRequest, DEFAULT_PROFILE};
pub use envelope::{
    ConfidenceMeta, Envelope, PolicyMeta, ProvenanceMeta, ResponseMeta, UncertaintyMeta,
};
pub use error::{Error, Result};
pub use request::ApiRequest;
