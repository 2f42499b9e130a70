//! Image preprocessing for OCR.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use tracing::debug;

/// Image preprocessor for the OCR pipeline.
///
/// Normalizes a raw scan for the engine: optional downscale of oversized
/// images, then grayscale conversion with Otsu binarization.
pub struct ImagePreprocessor {
    /// Maximum image dimension (longer side).
    max_size: u32,
    /// Whether to binarize after grayscale conversion.
    binarize: bool,
}

impl ImagePreprocessor {
    /// Create a preprocessor with default settings.
    pub fn new() -> Self {
        Self {
            max_size: 2048,
            binarize: true,
        }
    }

    /// Set maximum image dimension.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = size;
        self
    }

    /// Enable or disable binarization.
    pub fn with_binarize(mut self, binarize: bool) -> Self {
        self.binarize = binarize;
        self
    }

    /// Prepare an image for OCR.
    pub fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        let resized = self.resize_to_max(image);
        let gray = resized.to_luma8();

        if !self.binarize {
            return DynamicImage::ImageLuma8(gray);
        }

        DynamicImage::ImageLuma8(self.otsu_binarize(&gray))
    }

    fn resize_to_max(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let max_dim = width.max(height);

        if max_dim <= self.max_size {
            return image.clone();
        }

        let scale = self.max_size as f32 / max_dim as f32;
        let new_width = ((width as f32 * scale) as u32).max(1);
        let new_height = ((height as f32 * scale) as u32).max(1);

        debug!(
            "Downscaling image {}x{} -> {}x{}",
            width, height, new_width, new_height
        );

        image.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
    }

    fn otsu_binarize(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let total = (width as u64) * (height as u64);
        if total == 0 {
            return image.clone();
        }

        let mut histogram = [0u32; 256];
        for pixel in image.pixels() {
            histogram[pixel[0] as usize] += 1;
        }

        let threshold = otsu_level(&histogram, total);
        debug!(threshold, "binarizing with Otsu threshold");

        let mut result = GrayImage::new(width, height);
        for (x, y, pixel) in image.enumerate_pixels() {
            let value = if pixel[0] > threshold { 255 } else { 0 };
            result.put_pixel(x, y, Luma([value]));
        }

        result
    }
}

/// Otsu's method: the threshold maximizing between-class variance.
fn otsu_level(histogram: &[u32; 256], total: u64) -> u8 {
    let sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut sum_background = 0.0;
    let mut weight_background = 0.0;
    let mut best_variance = 0.0;
    let mut best_level = 0u8;

    for level in 0..256usize {
        weight_background += histogram[level] as f64;
        if weight_background == 0.0 {
            continue;
        }

        let weight_foreground = total as f64 - weight_background;
        if weight_foreground == 0.0 {
            break;
        }

        sum_background += level as f64 * histogram[level] as f64;

        let mean_background = sum_background / weight_background;
        let mean_foreground = (sum - sum_background) / weight_foreground;
        let diff = mean_background - mean_foreground;
        let variance = weight_background * weight_foreground * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_binarizes_to_black_and_white() {
        let mut img = GrayImage::new(4, 2);
        for (x, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = Luma([if x < 2 { 30 } else { 220 }]);
        }

        let prepared = ImagePreprocessor::new().prepare(&DynamicImage::ImageLuma8(img));
        let gray = prepared.to_luma8();

        assert_eq!(gray.get_pixel(0, 0)[0], 0);
        assert_eq!(gray.get_pixel(3, 0)[0], 255);
    }

    #[test]
    fn test_oversized_image_is_downscaled() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(400, 100));
        let prepared = ImagePreprocessor::new().with_max_size(200).prepare(&img);

        assert_eq!(prepared.width(), 200);
        assert_eq!(prepared.height(), 50);
    }

    #[test]
    fn test_small_image_keeps_dimensions() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(100, 60));
        let prepared = ImagePreprocessor::new().prepare(&img);

        assert_eq!((prepared.width(), prepared.height()), (100, 60));
    }

    #[test]
    fn test_otsu_level_separates_bimodal_histogram() {
        let mut histogram = [0u32; 256];
        histogram[30] = 100;
        histogram[220] = 100;

        let level = otsu_level(&histogram, 200);
        assert!((30..220).contains(&(level as usize)));
    }
}
