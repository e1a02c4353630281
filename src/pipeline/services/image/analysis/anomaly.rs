//! Lesion and damage detection from intensity percentiles and a low-threshold edge pass
use tracing::debug;

use super::core::FeatureExtractor;
use super::primitives::{edge_fraction, percentile};
use crate::config::AnomalyConfig;
use crate::error::Result;
use crate::pipeline::types::{AnomalyFeatures, DecodedImage};

pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }
}

impl FeatureExtractor for AnomalyDetector {
    type Output = AnomalyFeatures;

    fn extract(&self, image: &DecodedImage) -> Result<AnomalyFeatures> {
        let gray = image.gray();
        let dark_threshold = percentile(gray, self.config.dark_percentile);
        let bright_threshold = percentile(gray, self.config.bright_percentile);

        if dark_threshold == bright_threshold {
            debug!("Flat intensity distribution, skipping anomaly detection");
            return Ok(AnomalyFeatures::zeroed());
        }

        let total = image.pixel_count() as f64;
        let (dark, bright) = gray.as_raw().iter().fold((0usize, 0usize), |(dark, bright), &v| {
            let v = v as f64;
            // inverse-binary threshold semantics: at-or-below counts as dark
            (dark + (v <= dark_threshold) as usize, bright + (v > bright_threshold) as usize)
        });

        let dark_lesion_ratio = dark as f64 / total;
        let bright_discoloration_ratio = bright as f64 / total;
        let edge_damage_intensity = edge_fraction(gray, self.config.canny_low, self.config.canny_high);

        Ok(AnomalyFeatures {
            dark_lesion_ratio,
            bright_discoloration_ratio,
            edge_damage_intensity,
            anomaly_score: dark_lesion_ratio + bright_discoloration_ratio + edge_damage_intensity,
        })
    }

    fn name(&self) -> &'static str {
        "AnomalyDetector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn detector() -> AnomalyDetector {
        AnomalyDetector::new(AnomalyConfig::default())
    }

    #[test]
    fn flat_gray_image_is_all_zero() {
        let image = DecodedImage::new(ImageBuffer::from_pixel(30, 30, Rgb([128, 128, 128])));
        let features = detector().extract(&image).unwrap();
        assert_eq!(features, AnomalyFeatures::zeroed());
        assert_eq!(features.anomaly_score, 0.0);
    }

    #[test]
    fn mostly_flat_image_with_few_specks_is_still_degenerate() {
        // fewer than 20% of pixels differ, so both percentiles land on the background
        let image = DecodedImage::new(ImageBuffer::from_fn(10, 10, |x, y| {
            if x == 0 && y < 5 {
                Rgb([0, 0, 0])
            } else {
                Rgb([90, 90, 90])
            }
        }));
        assert_eq!(detector().extract(&image).unwrap(), AnomalyFeatures::zeroed());
    }

    #[test]
    fn two_tone_image_reports_dark_share() {
        let image = DecodedImage::new(ImageBuffer::from_fn(20, 20, |x, _| {
            if x < 10 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }));
        let features = detector().extract(&image).unwrap();

        assert_eq!(features.dark_lesion_ratio, 0.5);
        assert_eq!(features.bright_discoloration_ratio, 0.0);
        assert!(features.edge_damage_intensity > 0.0);
        let sum = features.dark_lesion_ratio
            + features.bright_discoloration_ratio
            + features.edge_damage_intensity;
        assert_eq!(features.anomaly_score, sum);
    }
}
