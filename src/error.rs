//! Error types for Parva API calls.
//!
//! Every failure the client can produce is an explicit variant carrying
//! enough context to diagnose it: the HTTP status and body for API errors,
//! the raw body and serde message for decode failures, and the underlying
//! `reqwest` error for network-level problems.

use http::StatusCode;

/// The main error type for Parva API calls.
///
/// # Examples
///
/// ```no_run
/// use parva_client::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new()?;
///
/// match client.today().await {
///     Ok(envelope) => println!("data: {}", envelope.data),
///     Err(Error::Api { status, body }) => {
///         eprintln!("API error {}: {}", status, body);
///     }
///     Err(Error::Decode { body, detail }) => {
///         eprintln!("Unparseable response ({}): {}", detail, body);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection refused, DNS lookup
    /// failure, timeout).
    ///
    /// All network-level failures are treated as transient: the request is
    /// an idempotent GET, so retrying after an ambiguous failure is safe.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server returned a non-2xx HTTP status code.
    ///
    /// 5xx responses are transient and retried up to the configured bound;
    /// 4xx responses indicate a client-side request error that retrying
    /// cannot fix, so they are surfaced immediately. When retries are
    /// exhausted the last 5xx error is returned as-is, status and body
    /// intact.
    #[error("Parva API {status}: {body}")]
    Api {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },

    /// The response body was not valid JSON.
    ///
    /// Distinct from [`Error::Api`]: this can occur on a 2xx response.
    /// Never retried.
    #[error("Failed to decode response: {detail}")]
    Decode {
        /// The raw response body that failed to parse.
        body: String,
        /// The serde error message.
        detail: String,
    },

    /// The per-call deadline elapsed before the call completed.
    ///
    /// The deadline covers the whole retry sequence — in-flight attempts
    /// and backoff sleeps alike — so an abandoned call stops promptly
    /// instead of completing its remaining retries.
    #[error("Call deadline exceeded")]
    DeadlineExceeded,

    /// An invalid base address was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Returns `true` if this error is safe to retry.
    ///
    /// Network errors and 5xx API errors are transient; everything else is
    /// fatal.
    ///
    /// # Examples
    ///
    /// ```
    /// use parva_client::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::SERVICE_UNAVAILABLE,
    ///     body: "upstream ephemeris outage".to_string(),
    /// };
    /// assert!(err.is_transient());
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::UNPROCESSABLE_ENTITY,
    ///     body: "unknown profile".to_string(),
    /// };
    /// assert!(!err.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Api { status, .. } => status.is_server_error(),
            Error::Decode { .. } => false,
            Error::DeadlineExceeded => false,
            Error::InvalidUrl(_) => false,
            Error::Configuration(_) => false,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Api { body, .. } => Some(body),
            Error::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Parva API calls.
pub type Result<T> = std::result::Result<T, Error>;
