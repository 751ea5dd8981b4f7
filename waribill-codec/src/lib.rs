//! The bill codec: a `Bill` in, a shareable reference out, and back.
//!
//! A reference is a single opaque URL path segment,
//! `w1.<base64url(json)>`: the version tag, a dot, then the unpadded
//! url-safe base64 of the bill's JSON wire form. The whole alphabet is
//! `[A-Za-z0-9_.-]`, so the reference survives transport as a URL
//! component with no escaping.
//!
//! There is no server and no bill store: the reference *is* the bill.
//! Everyone who receives it decodes their own independent copy.
//!
//! Decoding distinguishes two failure classes and never yields a partial
//! bill:
//! - [`DecodeError::MalformedReference`]: the string is not structurally
//!   a bill reference (wrong tag, bad base64, broken JSON);
//! - [`DecodeError::SchemaMismatch`]: the payload parses but required
//!   fields are absent, of the wrong type, or violate a bill invariant
//!   (negative quantity, duplicate id).
//!
//! The codec imposes no size limit of its own; URL length limits are the
//! transport's concern.

#![warn(clippy::uninlined_format_args)]

mod wire;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use thiserror::Error;
use waribill_domain::Bill;

use crate::wire::BillWire;

/// Version tag every reference starts with. Bump on breaking wire changes.
pub const REFERENCE_TAG: &str = "w1";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed bill reference: {detail}")]
    MalformedReference { detail: String },
    #[error("bill reference does not match the expected schema: {detail}")]
    SchemaMismatch { detail: String },
}

impl DecodeError {
    fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedReference {
            detail: detail.into(),
        }
    }

    pub(crate) fn schema(detail: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to serialize bill: {source}")]
pub struct EncodeError {
    #[from]
    source: serde_json::Error,
}

/// Serializes the bill into a shareable reference.
pub fn encode(bill: &Bill) -> Result<String, EncodeError> {
    let json = serde_json::to_vec(&BillWire::from(bill))?;
    Ok(format!("{REFERENCE_TAG}.{}", URL_SAFE_NO_PAD.encode(json)))
}

/// Reconstructs the bill a reference carries.
pub fn decode(reference: &str) -> Result<Bill, DecodeError> {
    let Some((tag, payload)) = reference.split_once('.') else {
        return Err(DecodeError::malformed("missing version tag"));
    };
    if tag != REFERENCE_TAG {
        return Err(DecodeError::malformed(format!(
            "unsupported version tag {tag:?}"
        )));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|err| DecodeError::malformed(format!("invalid base64 payload: {err}")))?;

    // Syntax first, shape second: a byte-level or JSON-level failure is a
    // malformed reference, anything after that is a schema mismatch.
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|err| DecodeError::malformed(format!("invalid json payload: {err}")))?;
    let wire: BillWire =
        serde_json::from_value(value).map_err(|err| DecodeError::schema(err.to_string()))?;

    wire.into_bill()
}
