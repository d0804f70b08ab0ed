//! Typed convenience operations for the stable Parva endpoints.
//!
//! Each operation maps its arguments to a path and parameter set and
//! delegates to [`Client::call`]. No argument validation happens locally;
//! the server's error responses surface unmodified through the error path.

use crate::client::Client;
use crate::envelope::Envelope;
use crate::request::ApiRequest;
use crate::Result;

/// Default calendrical profile applied when none is given.
pub const DEFAULT_PROFILE: &str = "np-mainstream";

// Kathmandu.
const DEFAULT_LATITUDE: f64 = 27.7172;
const DEFAULT_LONGITUDE: f64 = 85.3240;

/// Arguments for [`Client::resolve`].
///
/// Defaults: the `np-mainstream` profile, Kathmandu coordinates, and trace
/// capture enabled.
///
/// # Examples
///
/// ```
/// use parva_client::ResolveRequest;
///
/// let request = ResolveRequest::new("2026-10-21")
///     .profile("np-newar")
///     .coordinates(26.4525, 87.2718)
///     .include_trace(false);
/// ```
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// The Gregorian date to resolve, `YYYY-MM-DD`.
    pub date: String,
    /// Calendrical profile; [`DEFAULT_PROFILE`] when `None`.
    pub profile: Option<String>,
    /// Observer latitude in degrees.
    pub latitude: f64,
    /// Observer longitude in degrees.
    pub longitude: f64,
    /// Whether the server should record a retrievable computation trace.
    pub include_trace: bool,
}

impl ResolveRequest {
    /// Creates a resolve request for the given date with default profile,
    /// coordinates, and trace capture.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            profile: None,
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            include_trace: true,
        }
    }

    /// Sets the calendrical profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Sets the observer coordinates.
    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Sets whether the server records a computation trace.
    pub fn include_trace(mut self, include_trace: bool) -> Self {
        self.include_trace = include_trace;
        self
    }
}

impl Client {
    /// Returns today's date in every supported calendar.
    pub async fn today(&self) -> Result<Envelope> {
        self.call(&ApiRequest::new("/calendar/today")).await
    }

    /// Converts a Gregorian date (`YYYY-MM-DD`) to the local calendars.
    pub async fn convert(&self, date: &str) -> Result<Envelope> {
        self.call(&ApiRequest::new("/calendar/convert").with_param("date", date))
            .await
    }

    /// Returns the five-element panchanga for a date.
    ///
    /// Passing `None` omits the `date` parameter entirely and the server
    /// computes for its current date.
    pub async fn panchanga(&self, date: Option<&str>) -> Result<Envelope> {
        self.call(&ApiRequest::new("/calendar/panchanga").with_optional_param("date", date))
            .await
    }

    /// Lists festivals falling within the next `days` days.
    pub async fn upcoming(&self, days: u32) -> Result<Envelope> {
        self.call(&ApiRequest::new("/festivals/upcoming").with_param("days", days))
            .await
    }

    /// Explains how a festival's date is derived for a given year.
    pub async fn explain_festival(&self, festival_id: &str, year: i32) -> Result<Envelope> {
        self.call(
            &ApiRequest::new(format!("/festivals/{}/explain", festival_id))
                .with_param("year", year),
        )
        .await
    }

    /// Retrieves the step-by-step derivation recorded under a trace id.
    pub async fn explain_trace(&self, trace_id: &str) -> Result<Envelope> {
        self.call(&ApiRequest::new(format!("/explain/{}", trace_id)))
            .await
    }

    /// Resolves a date under a profile and observer location.
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<Envelope> {
        let profile = request.profile.as_deref().unwrap_or(DEFAULT_PROFILE);
        self.call(
            &ApiRequest::new("/resolve")
                .with_param("date", &request.date)
                .with_param("profile", profile)
                .with_param("latitude", request.latitude)
                .with_param("longitude", request.longitude)
                .with_param("include_trace", request.include_trace),
        )
        .await
    }

    /// Reports the server's conformance against the published calendar
    /// specification.
    pub async fn spec_conformance(&self) -> Result<Envelope> {
        self.call(&ApiRequest::new("/spec/conformance")).await
    }

    /// Verifies the provenance signature of a recorded trace.
    pub async fn verify_trace(&self, trace_id: &str) -> Result<Envelope> {
        self.call(&ApiRequest::new(format!("/provenance/verify/trace/{}", trace_id)))
            .await
    }
}
