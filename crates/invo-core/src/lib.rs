//! Core library for invoice/receipt OCR processing.
//!
//! This crate provides:
//! - Layout reconstruction: clustering OCR detections into reading-order
//!   lines and table rows
//! - Column inference from detected table headers
//! - A line-item extraction cascade (box-aware, text heuristics, loose
//!   fallback)
//! - Document field extraction (merchant, invoice number, date, total,
//!   currency)
//! - PDF content extraction and image preprocessing collaborators

pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod receipt;

pub use error::{InvoError, Result};
pub use models::{InvoConfig, InvoiceRecord, LineItem};
pub use ocr::{Detection, OcrCapture, OcrEngine};
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use receipt::{InvoiceExtractor, ReceiptParser};

#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
