//! Line/row clustering of OCR detections.
//!
//! Detections arrive as an unordered bag of positioned fragments. Grouping
//! them into horizontal bands recovers visual lines and table rows; bands
//! are keyed by a y-bucket derived from the median glyph height, so the
//! bucket is narrower than a full line but wide enough to absorb OCR
//! jitter.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use super::Detection;

/// Glyph height assumed when no detections carry an extent.
const FALLBACK_GLYPH_HEIGHT: f32 = 10.0;

/// Fraction of the median glyph height used as the bucket size.
const BUCKET_FRACTION: f32 = 0.6;

/// A fragment positioned by the center of its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedFragment {
    /// Horizontal center.
    pub x: f32,
    /// Vertical center.
    pub y: f32,
    /// Fragment text.
    pub text: String,
    /// Recognition confidence.
    pub confidence: f32,
}

/// One horizontal band: a visual line or table row, fragments left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// Fragments sorted by horizontal center.
    pub fragments: Vec<PositionedFragment>,
}

impl Band {
    /// The band's text, fragments joined with single spaces.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Clusters detections into reading-order bands.
#[derive(Debug, Clone)]
pub struct LineClusterer {
    /// Lower bound for the bucket size.
    min_bucket: f32,
}

impl LineClusterer {
    /// Create a clusterer with the row-clustering minimum bucket size.
    pub fn new() -> Self {
        Self { min_bucket: 6.0 }
    }

    /// Set the minimum bucket size.
    pub fn with_min_bucket(mut self, min_bucket: f32) -> Self {
        self.min_bucket = min_bucket;
        self
    }

    /// Group detections into bands, top to bottom.
    ///
    /// Deterministic for a given detection set regardless of input order:
    /// bucket keys are monotonic in y and fragments within a band order by
    /// x (ties by text).
    pub fn cluster(&self, detections: &[Detection]) -> Vec<Band> {
        if detections.is_empty() {
            return Vec::new();
        }

        let bucket = self.bucket_size(detections);
        debug!(bucket, count = detections.len(), "clustering detections");

        let mut rows: BTreeMap<i64, Vec<PositionedFragment>> = BTreeMap::new();
        for detection in detections {
            let (x, y) = detection.center();
            let key = (y / bucket).floor() as i64;
            rows.entry(key).or_default().push(PositionedFragment {
                x,
                y,
                text: detection.text.clone(),
                confidence: detection.confidence,
            });
        }

        rows.into_values()
            .map(|mut fragments| {
                fragments.sort_by(|a, b| {
                    a.x.partial_cmp(&b.x)
                        .unwrap_or(Ordering::Equal)
                        .then_with(|| a.text.cmp(&b.text))
                });
                Band { fragments }
            })
            .collect()
    }

    /// Bucket size: max(min_bucket, round(median glyph height * 0.6)).
    fn bucket_size(&self, detections: &[Detection]) -> f32 {
        let mut heights: Vec<f32> = detections.iter().map(|d| d.vertical_extent()).collect();
        heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let median = heights
            .get(heights.len() / 2)
            .copied()
            .unwrap_or(FALLBACK_GLYPH_HEIGHT);

        (median * BUCKET_FRACTION).round().max(self.min_bucket)
    }
}

impl Default for LineClusterer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x: f32, y: f32, height: f32, text: &str) -> Detection {
        Detection {
            bbox: [x, y, x + 30.0, y, x + 30.0, y + height, x, y + height],
            text: text.to_string(),
            confidence: 1.0,
        }
    }

    #[test]
    fn test_empty_input_yields_no_bands() {
        assert!(LineClusterer::new().cluster(&[]).is_empty());
    }

    #[test]
    fn test_fragments_on_one_line_share_a_band() {
        let detections = vec![
            det(200.0, 100.0, 20.0, "2"),
            det(10.0, 102.0, 20.0, "Widget"),
            det(300.0, 98.0, 20.0, "22.75"),
        ];

        let bands = LineClusterer::new().cluster(&detections);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].text(), "Widget 2 22.75");
    }

    #[test]
    fn test_separate_lines_stay_separate() {
        let detections = vec![
            det(10.0, 40.0, 20.0, "second"),
            det(10.0, 10.0, 20.0, "first"),
            det(10.0, 70.0, 20.0, "third"),
        ];

        let bands = LineClusterer::new().cluster(&detections);
        let texts: Vec<String> = bands.iter().map(|b| b.text()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_clustering_is_input_order_independent() {
        let detections = vec![
            det(10.0, 10.0, 18.0, "Item"),
            det(150.0, 11.0, 18.0, "Qty"),
            det(250.0, 9.0, 18.0, "Price"),
            det(10.0, 42.0, 18.0, "Coffee"),
            det(150.0, 40.0, 18.0, "2"),
            det(250.0, 41.0, 18.0, "8.50"),
        ];

        let forward = LineClusterer::new().cluster(&detections);

        let mut reversed = detections.clone();
        reversed.reverse();
        let backward = LineClusterer::new().cluster(&reversed);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_min_bucket_floor_applies() {
        // Tiny glyphs: 0.6 * median rounds below the floor.
        let detections = vec![det(10.0, 3.0, 4.0, "a"), det(10.0, 9.0, 4.0, "b")];

        // Floor of 6 puts y=3 and y=9 in buckets 0 and 1.
        let bands = LineClusterer::new().cluster(&detections);
        assert_eq!(bands.len(), 2);
    }
}
