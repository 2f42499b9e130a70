//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::InvoError;

/// Main configuration for the invo pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// OCR engine and preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files for the native engine.
    pub model_dir: PathBuf,

    /// Minimum detection confidence; fragments below it are dropped.
    pub confidence_threshold: f32,

    /// Maximum image dimension (longer side) before OCR.
    pub max_image_size: u32,

    /// Binarize images (grayscale + Otsu threshold) before OCR.
    pub binarize: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            confidence_threshold: 0.0,
            max_image_size: 2048,
            binarize: true,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Prefer embedded text over OCR when a PDF carries enough of it.
    pub prefer_embedded_text: bool,

    /// Minimum text length to consider embedded text usable.
    pub min_text_length: usize,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            prefer_embedded_text: true,
            min_text_length: 50,
            max_pages: 10,
        }
    }
}

impl InvoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, InvoError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| InvoError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), InvoError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| InvoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
