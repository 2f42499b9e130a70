//! Parse orchestrator: cascade composition and record assembly.

use tracing::debug;

use crate::models::{InvoiceRecord, LineItem};
use crate::ocr::{Detection, OcrCapture};

use super::items;
use super::rules::{
    extract_currency, extract_date, extract_invoice_number, extract_merchant_name,
    extract_total_amount,
};
use super::InvoiceExtractor;

/// Invoice/receipt parser over OCR detections and reconstructed text.
///
/// Parsing is a pure function of its input: it never errors, and a field
/// that cannot be extracted is simply absent from the record.
#[derive(Debug, Clone, Default)]
pub struct ReceiptParser;

impl ReceiptParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse reconstructed text plus the detections it came from.
    pub fn parse(&self, text: &str, detections: &[Detection]) -> InvoiceRecord {
        let text = normalize_ocr_text(text);

        debug!(
            chars = text.len(),
            detections = detections.len(),
            "parsing document"
        );

        let line_items = self.extract_line_items(&text, detections);
        debug!(count = line_items.len(), "extracted line items");

        InvoiceRecord {
            merchant_name: extract_merchant_name(&text),
            invoice_number: extract_invoice_number(&text),
            date: extract_date(&text),
            total_amount: extract_total_amount(&text),
            currency: extract_currency(&text),
            line_items,
        }
    }

    /// Run the extraction cascade; the first non-empty result wins.
    fn extract_line_items(&self, text: &str, detections: &[Detection]) -> Vec<LineItem> {
        let mut line_items = if detections.is_empty() {
            Vec::new()
        } else {
            items::extract_from_boxes(detections)
        };

        if line_items.is_empty() {
            line_items = items::extract_from_text(text);
        }
        if line_items.is_empty() {
            line_items = items::extract_loose(text);
        }

        line_items
    }
}

impl InvoiceExtractor for ReceiptParser {
    fn extract(&self, capture: &OcrCapture) -> InvoiceRecord {
        self.parse(&capture.text, &capture.detections)
    }

    fn extract_from_text(&self, text: &str) -> InvoiceRecord {
        self.parse(text, &[])
    }
}

/// Normalize known OCR misreads before field extraction.
///
/// "T0TAL" is the classic zero-for-O confusion; the due-amount labels are
/// recapitalized so the priority patterns see their canonical spelling.
fn normalize_ocr_text(text: &str) -> String {
    text.replace("T0TAL", "TOTAL")
        .replace("BALANCE DUE", "Balance Due")
        .replace("AMOUNT DUE", "Amount Due")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_end_to_end_text_parse() {
        let text = "Invoice No: INV-2024-001\n01/02/2024\nGrand Total: $45.50\nWidget  2  22.75";
        let record = ReceiptParser::new().extract_from_text(text);

        assert_eq!(record.invoice_number.as_deref(), Some("INV-2024-001"));
        assert_eq!(record.date.as_deref(), Some("01/02/2024"));
        assert_eq!(record.total_amount, Some(45.5));
        assert_eq!(record.currency.as_deref(), Some("USD"));

        assert_eq!(record.line_items.len(), 1);
        assert_eq!(record.line_items[0].item, "Widget");
        assert_eq!(record.line_items[0].quantity, 2);
        assert_eq!(record.line_items[0].price, 22.75);
    }

    #[test]
    fn test_empty_input_yields_empty_record() {
        let record = ReceiptParser::new().extract(&OcrCapture::empty());

        assert_eq!(record, InvoiceRecord::empty());
    }

    #[test]
    fn test_ocr_misread_normalization() {
        let record = ReceiptParser::new().extract_from_text("Corner Cafe\nGRAND T0TAL: 12.50");
        assert_eq!(record.total_amount, Some(12.5));
    }

    #[test]
    fn test_cascade_falls_back_to_loose() {
        // No boxes, no columnar line, no second numeric token: strategies A
        // and B both come up empty and C supplies the item.
        let text = "Corner Cafe\nHouse blend 7.25";
        let record = ReceiptParser::new().extract_from_text(text);

        assert_eq!(record.line_items.len(), 1);
        assert_eq!(record.line_items[0].item, "House blend");
        assert_eq!(record.line_items[0].quantity, 1);
        assert_eq!(record.line_items[0].price, 7.25);
    }

    #[test]
    fn test_cascade_exhaustion_is_not_an_error() {
        let record = ReceiptParser::new().extract_from_text("Corner Cafe\nno numbers here at all");
        assert!(record.line_items.is_empty());
        assert_eq!(record.merchant_name.as_deref(), Some("Corner Cafe"));
    }

    #[test]
    fn test_summary_lines_never_become_items() {
        let text = "Fresh Mart\nSUBTOTAL 12.00\nTOTAL 12.00";
        let record = ReceiptParser::new().extract_from_text(text);
        assert!(record.line_items.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let text = "Fresh Mart\nInvoice No: 42\nCoffee  2  8.50\nGrand Total: $17.00";
        let parser = ReceiptParser::new();

        let first = serde_json::to_string(&parser.extract_from_text(text)).unwrap();
        let second = serde_json::to_string(&parser.extract_from_text(text)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_boxes_feed_column_extraction() {
        fn det(x: f32, y: f32, text: &str) -> Detection {
            Detection {
                bbox: [x, y, x + 40.0, y, x + 40.0, y + 20.0, x, y + 20.0],
                text: text.to_string(),
                confidence: 0.95,
            }
        }

        let capture = OcrCapture::from_detections(
            vec![
                det(10.0, 10.0, "Fresh"),
                det(80.0, 10.0, "Mart"),
                det(10.0, 60.0, "Item"),
                det(200.0, 60.0, "Qty"),
                det(320.0, 60.0, "Total"),
                det(10.0, 110.0, "Coffee"),
                det(200.0, 110.0, "2"),
                det(320.0, 110.0, "17.00"),
            ],
            0.0,
        );

        let record = ReceiptParser::new().extract(&capture);

        assert_eq!(record.merchant_name.as_deref(), Some("Fresh Mart"));
        assert_eq!(record.line_items.len(), 1);
        assert_eq!(record.line_items[0].item, "Coffee");
        assert_eq!(record.line_items[0].quantity, 2);
        assert_eq!(record.line_items[0].price, 17.0);
    }
}
