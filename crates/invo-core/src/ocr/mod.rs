//! OCR collaborator interface and text reconstruction.
//!
//! The engine itself is external: anything that can turn an image into a
//! list of [`Detection`]s plugs in through the [`OcrEngine`] trait. The
//! parsing core only ever sees detections and reconstructed text.

mod layout;
mod preprocessing;
mod table;

#[cfg(feature = "native")]
mod pure_engine;

pub use layout::{Band, LineClusterer, PositionedFragment};
pub use preprocessing::ImagePreprocessor;
pub use table::{detect_header, ColumnMap, ColumnRole, TableHeader};

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// One recognized text fragment with its bounding quadrilateral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Quadrilateral coordinates (x1, y1, x2, y2, x3, y3, x4, y4).
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl Detection {
    /// Get the center point of the bounding quadrilateral.
    pub fn center(&self) -> (f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0)
    }

    /// Get the axis-aligned bounding rectangle (min_x, min_y, max_x, max_y).
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }

    /// Vertical extent of the quadrilateral (max_y - min_y).
    pub fn vertical_extent(&self) -> f32 {
        let (_, min_y, _, max_y) = self.rect();
        max_y - min_y
    }
}

/// Trait for the OCR engine collaborator.
///
/// The engine is constructed once by the caller and passed by reference;
/// there is no process-global handle.
pub trait OcrEngine {
    /// Detect and recognize text fragments in an image.
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>, OcrError>;
}

/// OCR output for one document: detections plus reconstructed text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrCapture {
    /// Detected text fragments. Blank fragments are dropped.
    pub detections: Vec<Detection>,

    /// Reading-order text (bands joined with spaces, lines with newlines).
    pub text: String,
}

impl OcrCapture {
    /// Create an empty capture (no detections, no text).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a capture from raw detections.
    ///
    /// Fragments below the confidence threshold or with whitespace-only
    /// text are discarded; the remainder is clustered into reading-order
    /// lines. An empty or whitespace-only detection list reconstructs to
    /// `("", [])` and never errors.
    pub fn from_detections(detections: Vec<Detection>, confidence_threshold: f32) -> Self {
        let detections: Vec<Detection> = detections
            .into_iter()
            .filter(|d| d.confidence >= confidence_threshold && !d.text.trim().is_empty())
            .collect();

        if detections.is_empty() {
            return Self::empty();
        }

        let clusterer = LineClusterer::new().with_min_bucket(5.0);
        let bands = clusterer.cluster(&detections);
        let text = bands
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n");

        Self { detections, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x: f32, y: f32, text: &str) -> Detection {
        Detection {
            bbox: [x, y, x + 40.0, y, x + 40.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_empty_capture_never_errors() {
        let capture = OcrCapture::from_detections(Vec::new(), 0.0);
        assert_eq!(capture.text, "");
        assert!(capture.detections.is_empty());
    }

    #[test]
    fn test_whitespace_only_capture_is_empty() {
        let capture = OcrCapture::from_detections(vec![det(0.0, 0.0, "   ")], 0.0);
        assert_eq!(capture.text, "");
        assert!(capture.detections.is_empty());
    }

    #[test]
    fn test_reconstruction_follows_reading_order() {
        // Two lines, fragments deliberately out of order.
        let detections = vec![
            det(100.0, 50.0, "World"),
            det(10.0, 50.0, "Hello"),
            det(10.0, 10.0, "Receipt"),
        ];

        let capture = OcrCapture::from_detections(detections, 0.0);
        assert_eq!(capture.text, "Receipt\nHello World");
    }

    #[test]
    fn test_confidence_threshold_filters_fragments() {
        let mut low = det(10.0, 10.0, "noise");
        low.confidence = 0.1;
        let capture = OcrCapture::from_detections(vec![low, det(10.0, 30.0, "kept")], 0.5);

        assert_eq!(capture.text, "kept");
        assert_eq!(capture.detections.len(), 1);
    }

    #[test]
    fn test_detection_geometry() {
        let d = det(10.0, 20.0, "x");
        assert_eq!(d.center(), (30.0, 25.0));
        assert_eq!(d.vertical_extent(), 10.0);
    }
}
