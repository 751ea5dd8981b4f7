//! Typed boundary for the receipt-extraction collaborator.
//!
//! The collaborator (an external OCR + text-understanding service, or
//! this repo's own [`crate::receipt`] scanner) proposes bill entries as
//! `{ items: [{name, quantity, price}], extraFees: [{name, amount,
//! type, expectedCount?}] }`, or reports `{ error }`. Anything else is an
//! invalid payload, surfaced as a value. The core never crashes on a
//! collaborator's malformed answer, and nothing reaches the domain types
//! without passing their validating constructors.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ExtractionError;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ExtractedReceipt {
    pub items: Vec<ExtractedItem>,
    #[serde(rename = "extraFees")]
    pub extra_fees: Vec<ExtractedFee>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ExtractedItem {
    pub name: String,
    pub quantity: u32,
    /// Total paid price for the line, not the unit price.
    pub price: Decimal,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ExtractedFee {
    pub name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: ExtractedFeeKind,
    #[serde(rename = "expectedCount", default)]
    pub expected_count: Option<u32>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum ExtractedFeeKind {
    #[serde(rename = "perOrder")]
    PerOrder,
    #[serde(rename = "perPerson")]
    PerPerson,
}

#[derive(Deserialize)]
struct CollaboratorFailure {
    error: String,
}

impl ExtractedReceipt {
    /// Reads a collaborator response. The explicit `{error}` form and any
    /// shape mismatch both come back as values.
    pub fn from_json(payload: &str) -> Result<Self, ExtractionError> {
        let value: serde_json::Value =
            serde_json::from_str(payload).map_err(|err| ExtractionError::InvalidPayload {
                detail: format!("invalid json: {err}"),
            })?;

        if let Ok(failure) = CollaboratorFailure::deserialize(&value) {
            return Err(ExtractionError::Collaborator {
                message: failure.error,
            });
        }

        Self::deserialize(&value).map_err(|err| {
            tracing::warn!("rejected extraction payload: {err}");
            ExtractionError::InvalidPayload {
                detail: err.to_string(),
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.extra_fees.is_empty()
    }
}
