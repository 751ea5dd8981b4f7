#![warn(clippy::uninlined_format_args)]

pub mod ocr;

pub use ocr::{OcrModelPaths, OcrsReceiptReader};
