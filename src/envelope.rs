//! The response envelope and its metadata block.
//!
//! Every Parva endpoint answers with `{"data": ..., "meta": {...}}`. The
//! `data` value is kept as an opaque JSON blob and decoded into a
//! caller-chosen type in a separate step, so the envelope does not need to
//! know about every result shape the API can produce.
//!
//! Servers that predate the envelope format answer with the bare payload
//! and no `meta` block. [`Envelope::from_body`] accepts both: it tries the
//! enveloped shape first and otherwise wraps the whole body as the payload,
//! attaching a sentinel-valued metadata block.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::{Error, Result};

/// Qualitative confidence level plus a numeric score in `[0, 1]`.
///
/// Known levels are `official`, `computed`, `estimated`, and `unknown`, but
/// the field is kept as a plain string so new server-side levels do not
/// break decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceMeta {
    pub level: String,
    pub score: f64,
}

impl Default for ConfidenceMeta {
    fn default() -> Self {
        Self {
            level: "unknown".to_string(),
            score: 0.5,
        }
    }
}

/// Provenance of the dataset and rules behind a response. Every field is
/// independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvenanceMeta {
    pub snapshot_id: Option<String>,
    pub dataset_hash: Option<String>,
    pub rules_hash: Option<String>,
    pub verify_url: Option<String>,
    pub signature: Option<String>,
}

/// Uncertainty attached to a computed date or time.
///
/// `boundary_risk` flags results that fall near a calendrical transition
/// boundary and may be sensitive to observation-time assumptions; known
/// values are `low`, `medium`, `high`, and `unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UncertaintyMeta {
    pub interval_hours: Option<f64>,
    pub boundary_risk: String,
}

impl Default for UncertaintyMeta {
    fn default() -> Self {
        Self {
            interval_hours: None,
            boundary_risk: "unknown".to_string(),
        }
    }
}

/// The calendrical profile and jurisdiction the response was resolved
/// under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyMeta {
    pub profile: String,
    pub jurisdiction: String,
    pub advisory: bool,
}

impl Default for PolicyMeta {
    fn default() -> Self {
        Self {
            profile: "np-mainstream".to_string(),
            jurisdiction: "NP".to_string(),
            advisory: true,
        }
    }
}

/// The metadata block attached to every response.
///
/// The `Default` value is the compatibility block synthesized for responses
/// from servers that do not send one: every field is a documented sentinel
/// (`unknown` confidence at score 0.5, `unknown` method, empty provenance,
/// advisory `np-mainstream` policy), not a real measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMeta {
    pub confidence: ConfidenceMeta,
    pub method: String,
    pub provenance: ProvenanceMeta,
    pub uncertainty: UncertaintyMeta,
    pub trace_id: Option<String>,
    pub policy: PolicyMeta,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            confidence: ConfidenceMeta::default(),
            method: "unknown".to_string(),
            provenance: ProvenanceMeta::default(),
            uncertainty: UncertaintyMeta::default(),
            trace_id: None,
            policy: PolicyMeta::default(),
        }
    }
}

/// A decoded API response: an opaque JSON payload plus its metadata block.
///
/// # Examples
///
/// ```no_run
/// use parva_client::Client;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Panchanga {
///     tithi: String,
/// }
///
/// # async fn example() -> Result<(), parva_client::Error> {
/// let client = Client::new()?;
/// let envelope = client.panchanga(Some("2025-01-15")).await?;
///
/// let panchanga: Panchanga = envelope.decode()?;
/// println!("tithi: {}", panchanga.tithi);
/// println!("confidence: {}", envelope.meta.confidence.level);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// The payload, exactly as the server sent it.
    pub data: Box<RawValue>,
    /// The metadata block, synthesized when the server did not send one.
    pub meta: ResponseMeta,
}

/// The wire shape, with both fields optional so bare legacy payloads that
/// happen to be objects do not fail the first parse.
#[derive(Deserialize)]
struct WireEnvelope {
    data: Option<Box<RawValue>>,
    meta: Option<ResponseMeta>,
}

impl Envelope {
    /// Decodes a raw response body into an envelope.
    ///
    /// Bodies in the enveloped shape are returned as-is; any other valid
    /// JSON body is wrapped whole as the payload with a sentinel metadata
    /// block. Only a body that is not valid JSON at all is an error.
    pub fn from_body(body: &str) -> Result<Envelope> {
        if let Ok(wire) = serde_json::from_str::<WireEnvelope>(body) {
            if let Some(data) = wire.data {
                return Ok(Envelope {
                    data,
                    meta: wire.meta.unwrap_or_default(),
                });
            }
        }

        let data = RawValue::from_string(body.to_string()).map_err(|e| Error::Decode {
            body: body.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Envelope {
            data,
            meta: ResponseMeta::default(),
        })
    }

    /// Decodes the payload into a concrete type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(self.data.get()).map_err(|e| Error::Decode {
            body: self.data.get().to_string(),
            detail: e.to_string(),
        })
    }
}
