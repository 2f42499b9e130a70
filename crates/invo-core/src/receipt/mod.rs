//! Invoice/receipt field extraction module.

pub mod items;
mod parser;
pub mod rules;

pub use parser::ReceiptParser;

use crate::models::InvoiceRecord;
use crate::ocr::OcrCapture;

/// Trait for invoice record extractors.
pub trait InvoiceExtractor {
    /// Extract a record from an OCR capture (detections + text).
    fn extract(&self, capture: &OcrCapture) -> InvoiceRecord;

    /// Extract a record from plain text only.
    fn extract_from_text(&self, text: &str) -> InvoiceRecord;
}
