use thiserror::Error;
use waribill_domain::BillError;

/// Failures while assembling a bill from manual entry and extraction
/// output. Extraction rejections name the offending entry so the caller
/// can show which receipt line to fix.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error(transparent)]
    Invalid(#[from] BillError),
    #[error("extracted item {index} ({name:?}): {source}")]
    ExtractedItem {
        index: usize,
        name: String,
        source: BillError,
    },
    #[error("extracted fee {index} ({name:?}): {source}")]
    ExtractedFee {
        index: usize,
        name: String,
        source: BillError,
    },
}

/// Failures reading the extraction collaborator's response payload.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The collaborator answered with its explicit `{error}` form.
    #[error("extraction service reported: {message}")]
    Collaborator { message: String },
    /// The payload is not the documented `{items, extraFees}` shape.
    #[error("extraction payload does not match the expected shape: {detail}")]
    InvalidPayload { detail: String },
}

/// Failures in the OCR adapter behind the [`crate::ports::ReceiptOcr`]
/// port.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReceiptOcrError {
    #[error("failed to load OCR model {path:?}: {detail}")]
    ModelLoad { path: String, detail: String },
    #[error("failed to initialize OCR engine: {detail}")]
    EngineInit { detail: String },
    #[error("failed to decode receipt image: {detail}")]
    ImageDecode { detail: String },
    #[error("text recognition failed: {detail}")]
    Recognition { detail: String },
}

/// Failures turning recognized receipt text into candidate bill entries.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReceiptParseError {
    #[error("no item lines recognized in receipt text")]
    NoItems,
}
