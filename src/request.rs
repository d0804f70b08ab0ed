//! Per-call request description.

use std::time::Duration;

/// Describes a single API call: the endpoint path, its query parameters,
/// and an optional deadline for the whole retry sequence.
///
/// The convenience methods on [`crate::Client`] build these internally;
/// construct one directly to attach a deadline or to reach an endpoint the
/// facade does not cover.
///
/// # Examples
///
/// ```
/// use parva_client::ApiRequest;
/// use std::time::Duration;
///
/// let request = ApiRequest::new("/calendar/panchanga")
///     .with_param("date", "2025-01-15")
///     .with_deadline(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// The endpoint path, relative to the base address.
    pub path: String,

    /// Query parameters. Empty-string values are omitted from the query
    /// string entirely, distinguishing "unset" from "explicit empty".
    pub params: Vec<(String, String)>,

    /// Optional time limit for the whole call, covering every attempt and
    /// every backoff sleep.
    pub deadline: Option<Duration>,
}

impl ApiRequest {
    /// Creates a request for the given endpoint path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            deadline: None,
        }
    }

    /// Adds a query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Adds a query parameter only if a value is present.
    pub fn with_optional_param(
        mut self,
        key: impl Into<String>,
        value: Option<impl ToString>,
    ) -> Self {
        if let Some(value) = value {
            self.params.push((key.into(), value.to_string()));
        }
        self
    }

    /// Bounds the whole call — attempts and backoff sleeps — by a deadline.
    ///
    /// When the deadline elapses the call returns
    /// [`crate::Error::DeadlineExceeded`] promptly instead of completing
    /// its remaining retries.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
