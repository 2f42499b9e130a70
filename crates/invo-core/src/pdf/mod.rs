//! PDF processing module.
//!
//! Scanned invoices arrive as PDFs whose pages carry full-page scan
//! images. This module extracts those embedded images for the OCR path and
//! embedded text as the fallback; page rasterization itself stays outside
//! the parsing core.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Contains only images (scanned document).
    Image,
    /// Contains both text and images.
    Hybrid,
    /// Empty or unreadable.
    Empty,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Analyze the PDF to determine its type.
    fn analyze(&self) -> PdfType;

    /// Extract embedded text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract embedded images from a page.
    fn extract_images(&self, page: u32) -> Result<Vec<image::DynamicImage>>;
}
