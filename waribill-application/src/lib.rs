#![warn(clippy::uninlined_format_args)]

pub mod builder;
pub mod error;
pub mod extraction;
pub mod ports;
pub mod receipt;
pub mod session;

pub use builder::BillBuilder;
pub use error::{BuildError, ExtractionError, ReceiptOcrError, ReceiptParseError};
pub use extraction::{ExtractedFee, ExtractedFeeKind, ExtractedItem, ExtractedReceipt};
pub use ports::{ReceiptOcr, ReceiptPhoto};
pub use receipt::{ReceiptScan, scan_receipt_text};
pub use session::CalculatorSession;
