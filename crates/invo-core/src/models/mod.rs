//! Data models: the output record and pipeline configuration.

pub mod config;
pub mod record;

pub use config::{InvoConfig, OcrConfig, PdfConfig};
pub use record::{InvoiceRecord, LineItem};
