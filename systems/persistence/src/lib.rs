#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persisted form of survey generation records.
//!
//! A record is stored as a single line `survey:v1:<payload>` where the payload
//! is unpadded base64 of a JSON object with the fields `seed`, `bodyId`,
//! `centerLatitude`, `centerLongitude` and `tier`. Only these values are
//! stored; the waypoints themselves are regenerated from them on load.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use navsurvey_core::{BodyId, GenerationRecord, SurfaceCoordinate, Tier};
use serde::{Deserialize, Serialize};

const RECORD_DOMAIN: &str = "survey";
const RECORD_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded record payload.
pub const RECORD_HEADER: &str = "survey:v1";
const FIELD_DELIMITER: char = ':';

/// Reasons a persisted record could not be restored.
#[derive(Debug, thiserror::Error)]
pub enum CorruptRecord {
    /// The provided string was empty or contained only whitespace.
    #[error("survey record was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("survey record is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("survey record is missing the version")]
    MissingVersion,
    /// The payload segment was missing.
    #[error("survey record is missing the payload")]
    MissingPayload,
    /// The record used an unexpected prefix segment.
    #[error("survey record prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The record used an unsupported version identifier.
    #[error("survey record version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode survey payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse survey payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// A field without a usable default was absent.
    #[error("survey record is missing the '{0}' field")]
    MissingField(&'static str),
    /// A field held a value outside its domain.
    #[error("survey record field '{field}' is out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value found in the payload.
        value: f64,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializableRecord {
    #[serde(default)]
    seed: Option<i64>,
    #[serde(default)]
    body_id: Option<u32>,
    #[serde(default)]
    center_latitude: Option<f64>,
    #[serde(default)]
    center_longitude: Option<f64>,
    #[serde(default)]
    tier: Option<u8>,
}

/// Encodes `record` into its single-line persisted form.
#[must_use]
pub fn save(record: &GenerationRecord) -> String {
    let payload = SerializableRecord {
        seed: Some(record.seed),
        body_id: Some(record.body.get()),
        center_latitude: Some(record.center.latitude()),
        center_longitude: Some(record.center.longitude()),
        tier: Some(record.tier.index()),
    };
    let json = serde_json::to_vec(&payload).expect("survey record serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{RECORD_HEADER}{FIELD_DELIMITER}{encoded}")
}

/// Decodes a record from its persisted form.
///
/// `seed` and `bodyId` are required. A missing center defaults to the
/// origin and a missing tier to [`Tier::Trivial`]; present values must be
/// within their domain.
pub fn load(value: &str) -> Result<GenerationRecord, CorruptRecord> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CorruptRecord::EmptyPayload);
    }

    let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
    let domain = parts.next().ok_or(CorruptRecord::MissingPrefix)?;
    let version = parts.next().ok_or(CorruptRecord::MissingVersion)?;
    let payload = parts.next().ok_or(CorruptRecord::MissingPayload)?;

    if domain != RECORD_DOMAIN {
        return Err(CorruptRecord::InvalidPrefix(domain.to_owned()));
    }
    if version != RECORD_VERSION {
        return Err(CorruptRecord::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(CorruptRecord::InvalidEncoding)?;
    let decoded: SerializableRecord =
        serde_json::from_slice(&bytes).map_err(CorruptRecord::InvalidPayload)?;

    let seed = decoded.seed.ok_or(CorruptRecord::MissingField("seed"))?;
    let body = decoded
        .body_id
        .map(BodyId::new)
        .ok_or(CorruptRecord::MissingField("bodyId"))?;
    let latitude = decoded.center_latitude.unwrap_or(0.0);
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CorruptRecord::OutOfRange {
            field: "centerLatitude",
            value: latitude,
        });
    }
    let longitude = decoded.center_longitude.unwrap_or(0.0);
    let tier = match decoded.tier {
        None => Tier::default(),
        Some(index) => Tier::from_index(index).ok_or(CorruptRecord::OutOfRange {
            field: "tier",
            value: f64::from(index),
        })?,
    };

    Ok(GenerationRecord {
        seed,
        body,
        center: SurfaceCoordinate::new(latitude, longitude),
        tier,
    })
}

/// Decodes a record, substituting [`GenerationRecord::fallback`] on `home`
/// when the stored value is corrupt.
#[must_use]
pub fn load_or_default(value: &str, home: BodyId) -> GenerationRecord {
    load(value).unwrap_or_else(|error| {
        tracing::warn!(%error, home = home.get(), "replacing corrupt survey record with defaults");
        GenerationRecord::fallback(home)
    })
}
