use crate::error::ReceiptOcrError;

/// A photographed receipt as received from the sharer, undecoded.
pub struct ReceiptPhoto<'a> {
    pub bytes: &'a [u8],
    pub content_type: Option<&'a str>,
}

/// Text recognition over a receipt photo. The one external boundary of
/// this crate; adapters live in the infrastructure crate.
pub trait ReceiptOcr: Send + Sync {
    fn extract_text(&self, photo: &ReceiptPhoto<'_>) -> Result<String, ReceiptOcrError>;
}
