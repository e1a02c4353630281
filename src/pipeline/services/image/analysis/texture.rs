//! Texture pattern analysis over the grayscale view
use imageproc::morphology::{grayscale_close, Mask};

use super::core::FeatureExtractor;
use super::primitives::{edge_fraction, gray_values, std_dev, variance};
use crate::config::TextureConfig;
use crate::error::Result;
use crate::pipeline::types::{DecodedImage, TextureFeatures};

pub struct TexturePatternAnalyzer {
    config: TextureConfig,
}

impl TexturePatternAnalyzer {
    pub fn new(config: TextureConfig) -> Self {
        Self { config }
    }
}

impl FeatureExtractor for TexturePatternAnalyzer {
    type Output = TextureFeatures;

    fn extract(&self, image: &DecodedImage) -> Result<TextureFeatures> {
        let gray = image.gray();

        let laplacian = imageproc::filter::laplacian_filter(gray);
        let variance = variance(laplacian.as_raw().iter().map(|&v| v as f64));

        let edge_density = edge_fraction(gray, self.config.canny_low, self.config.canny_high);

        // 3x3 square structuring element
        let closed = grayscale_close(gray, &Mask::square(1));
        let texture_contrast = std_dev(gray_values(&closed));

        Ok(TextureFeatures {
            variance,
            edge_density,
            texture_contrast,
            roughness_index: variance * edge_density,
        })
    }

    fn name(&self) -> &'static str {
        "TexturePatternAnalyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn analyzer() -> TexturePatternAnalyzer {
        TexturePatternAnalyzer::new(TextureConfig::default())
    }

    #[test]
    fn flat_image_has_no_texture() {
        let image = DecodedImage::new(ImageBuffer::from_pixel(20, 20, Rgb([60, 160, 60])));
        let features = analyzer().extract(&image).unwrap();

        assert_eq!(features.variance, 0.0);
        assert_eq!(features.edge_density, 0.0);
        assert_eq!(features.texture_contrast, 0.0);
        assert_eq!(features.roughness_index, 0.0);
    }

    #[test]
    fn closing_removes_isolated_dark_speck() {
        let mut rgb = ImageBuffer::from_pixel(5, 5, Rgb([200u8, 200, 200]));
        rgb.put_pixel(2, 2, Rgb([0, 0, 0]));
        let features = analyzer().extract(&DecodedImage::new(rgb)).unwrap();

        assert_eq!(features.texture_contrast, 0.0);
        assert!(features.variance > 0.0);
    }

    #[test]
    fn fine_speckle_counts_as_edges() {
        let image = DecodedImage::new(ImageBuffer::from_fn(16, 16, |x, y| {
            if x % 4 == 1 && y % 4 == 1 {
                Rgb([170, 170, 170])
            } else {
                Rgb([90, 90, 90])
            }
        }));
        let features = analyzer().extract(&image).unwrap();

        assert_eq!(features.edge_density, 0.5);
        assert!(features.roughness_index > 0.0);
    }

    #[test]
    fn checkerboard_is_rough() {
        let image = DecodedImage::new(ImageBuffer::from_fn(32, 32, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }));
        let features = analyzer().extract(&image).unwrap();

        assert!(features.variance > 0.0);
        assert!(features.edge_density > 0.0 && features.edge_density <= 1.0);
        assert!(features.texture_contrast > 0.0);
        assert!((features.roughness_index - features.variance * features.edge_density).abs() < 1e-9);
    }
}
