//! HTTP client with a bounded retry loop and envelope decoding.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure one, or [`Client::new`] for the local-development defaults.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use url::Url;

use crate::envelope::Envelope;
use crate::request::ApiRequest;
use crate::retry::Backoff;
use crate::{Error, Result};

/// Base address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/v5/api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_RETRIES: usize = 2;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(300);

/// A client for the Parva calendar API.
///
/// The client is designed to be created once and reused: it holds a pooled
/// HTTP transport and read-only configuration, so clones are cheap and
/// concurrent calls from multiple tasks need no locking.
///
/// All operations are GETs against a configured base address. Transient
/// failures (network errors, 5xx responses) are retried with exponential
/// backoff; 4xx responses fail immediately.
///
/// # Examples
///
/// ```no_run
/// use parva_client::{Client, ResolveRequest};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), parva_client::Error> {
/// let client = Client::builder()
///     .base_url("https://parva.dev/v5/api")?
///     .timeout(Duration::from_secs(10))
///     .retries(3)
///     .build()?;
///
/// let today = client.today().await?;
/// println!("today: {}", today.data);
///
/// let resolved = client
///     .resolve(&ResolveRequest::new("2026-10-21"))
///     .await?;
/// println!("trace: {:?}", resolved.meta.trace_id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    // Kept as a trimmed string: paths are appended verbatim, so the base
    // may itself carry a path prefix such as `/v5/api`.
    base_url: String,
    timeout: Duration,
    retries: usize,
    backoff: Backoff,
}

impl Client {
    /// Creates a client with the default configuration (local development
    /// server, 20 s timeout, 2 retries, 300 ms base backoff).
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Creates a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Executes an API call, retrying transient failures.
    ///
    /// The request is attempted up to `retries + 1` times. Network errors
    /// and 5xx responses sleep `backoff * 2^attempt` and retry; when
    /// attempts run out the last error is surfaced as-is. 4xx responses and
    /// undecodable bodies fail immediately. A deadline on the request
    /// bounds the whole sequence, backoff sleeps included.
    ///
    /// The convenience methods on this type cover the stable endpoints;
    /// `call` is the escape hatch for deadlines and unlisted paths.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use parva_client::{ApiRequest, Client};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> Result<(), parva_client::Error> {
    /// let client = Client::new()?;
    ///
    /// let envelope = client
    ///     .call(
    ///         &ApiRequest::new("/calendar/panchanga")
    ///             .with_param("date", "2025-01-15")
    ///             .with_deadline(Duration::from_secs(5)),
    ///     )
    ///     .await?;
    /// println!("{}", envelope.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call(&self, request: &ApiRequest) -> Result<Envelope> {
        let url = self.build_url(&request.path, &request.params)?;
        let deadline = request.deadline.map(|d| Instant::now() + d);

        let mut attempt = 0;
        loop {
            match self.execute(&url, attempt, deadline).await {
                Ok(envelope) => return Ok(envelope),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        path = %request.path,
                        "Request attempt failed"
                    );

                    if !e.is_transient() || attempt >= self.inner.retries {
                        return Err(e);
                    }

                    let delay = self.inner.backoff.delay_for_attempt(attempt);
                    tracing::info!(
                        delay_ms = delay.as_millis() as u64,
                        attempt = attempt + 1,
                        "Retrying after transient failure"
                    );
                    self.backoff_sleep(delay, deadline).await?;
                    attempt += 1;
                }
            }
        }
    }

    /// Executes a single attempt: one GET, one status check, one decode.
    async fn execute(
        &self,
        url: &Url,
        attempt: usize,
        deadline: Option<Instant>,
    ) -> Result<Envelope> {
        tracing::debug!(url = %url, attempt = attempt + 1, "Executing HTTP request");

        let started = Instant::now();
        let fut = async {
            let response = self
                .inner
                .http_client
                .get(url.clone())
                .timeout(self.inner.timeout)
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;

            if !status.is_success() {
                if status.is_client_error() {
                    tracing::error!(status = status.as_u16(), body = %body, "Client error (4xx)");
                } else {
                    tracing::warn!(status = status.as_u16(), body = %body, "Server error (5xx)");
                }
                return Err(Error::Api { status, body });
            }

            tracing::info!(
                status = status.as_u16(),
                latency_ms = started.elapsed().as_millis() as u64,
                "Received HTTP response"
            );
            Envelope::from_body(&body)
        };

        match deadline {
            Some(at) => match tokio::time::timeout_at(at, fut).await {
                Ok(result) => result,
                Err(_) => Err(Error::DeadlineExceeded),
            },
            None => fut.await,
        }
    }

    /// Sleeps for `delay`, racing the deadline when one is set.
    async fn backoff_sleep(&self, delay: Duration, deadline: Option<Instant>) -> Result<()> {
        match deadline {
            Some(at) => tokio::time::timeout_at(at, tokio::time::sleep(delay))
                .await
                .map_err(|_| Error::DeadlineExceeded),
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }

    fn build_url(&self, path: &str, params: &[(String, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.inner.base_url, path))?;

        let kept: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !kept.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in kept {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use parva_client::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), parva_client::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://parva.dev/v5/api")?
///     .timeout(Duration::from_secs(10))
///     .retries(3)
///     .backoff(Duration::from_millis(200))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    retries: usize,
    backoff: Duration,
    jitter: bool,
}

impl ClientBuilder {
    /// Creates a builder with the default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
            jitter: false,
        }
    }

    /// Sets the base address. Trailing slashes are stripped; the address
    /// may carry a path prefix (the default is `http://localhost:8000/v5/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not a valid URL.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let trimmed = url.as_ref().trim_end_matches('/');
        Url::parse(trimmed)?;
        self.base_url = Some(trimmed.to_string());
        Ok(self)
    }

    /// Sets the per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many times a transient failure is retried. The request is
    /// attempted up to `retries + 1` times in total.
    pub fn retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the base backoff delay. The delay before retry `n` (0-indexed)
    /// is `backoff * 2^n`.
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Randomizes each backoff delay to a factor in `0.5..=1.0` of its
    /// nominal value, spreading out retries from concurrent callers.
    pub fn jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Builds the configured [`Client`].
    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                timeout: self.timeout,
                retries: self.retries,
                backoff: Backoff {
                    base: self.backoff,
                    jitter: self.jitter,
                },
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
