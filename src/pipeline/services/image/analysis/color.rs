//! Color distribution analysis: dominant palette, green dominance and discoloration
use std::collections::BTreeMap;

use palette::{FromColor, Hsv, Srgb};

use super::clustering::{KMeans, WeightedPoint};
use super::core::FeatureExtractor;
use super::primitives::{mean, variance};
use crate::config::ColorConfig;
use crate::error::Result;
use crate::pipeline::types::{ColorFeatures, DecodedImage};

pub struct ColorDistributionAnalyzer {
    config: ColorConfig,
}

impl ColorDistributionAnalyzer {
    pub fn new(config: ColorConfig) -> Self {
        Self { config }
    }

    fn dominant_colors(&self, image: &DecodedImage) -> Result<Vec<[f64; 3]>> {
        // BTreeMap keeps the palette order stable, which the seeded clustering relies on
        let mut palette: BTreeMap<[u8; 3], u64> = BTreeMap::new();
        for pixel in image.rgb().pixels() {
            *palette.entry(pixel.0).or_insert(0) += 1;
        }

        let k = self.config.max_clusters.min(palette.len());
        if k <= 1 {
            return Ok(vec![mean_color(image)]);
        }

        let points: Vec<WeightedPoint> = palette
            .iter()
            .map(|(rgb, &count)| WeightedPoint {
                value: [rgb[0] as f64, rgb[1] as f64, rgb[2] as f64],
                weight: count as f64,
            })
            .collect();

        let clustering = KMeans::new(k, self.config.seed)
            .with_n_init(self.config.n_init)
            .with_max_iterations(self.config.max_iterations)
            .with_tolerance(self.config.tolerance)
            .fit(&points)?;

        Ok(clustering.centroids)
    }
}

impl FeatureExtractor for ColorDistributionAnalyzer {
    type Output = ColorFeatures;

    fn extract(&self, image: &DecodedImage) -> Result<ColorFeatures> {
        let dominant_colors = self.dominant_colors(image)?;

        let green_dominance = mean(dominant_colors.iter().map(|c| c[1])) / 255.0;
        let brown_yellow = dominant_colors
            .iter()
            .filter(|c| c[0] > c[2] && c[1] > c[2])
            .count();
        let discoloration_index = brown_yellow as f64 / dominant_colors.len() as f64;

        let hsv: Vec<[u8; 3]> = image.rgb().pixels().map(|p| hsv_bytes(p.0)).collect();
        let channel = |c: usize| hsv.iter().map(move |v| v[c] as f64);

        Ok(ColorFeatures {
            dominant_colors,
            green_dominance,
            discoloration_index,
            hue_variance: variance(channel(0)),
            saturation_mean: mean(channel(1)),
            brightness_mean: mean(channel(2)),
        })
    }

    fn name(&self) -> &'static str {
        "ColorDistributionAnalyzer"
    }
}

/// HSV as 8-bit samples: each unit-range channel scaled by 255 and truncated
fn hsv_bytes([r, g, b]: [u8; 3]) -> [u8; 3] {
    let rgb = Srgb::new(r, g, b).into_format::<f64>();
    let hsv: Hsv<palette::encoding::Srgb, f64> = Hsv::from_color(rgb);
    [
        to_byte(hsv.hue.into_positive_degrees() / 360.0),
        to_byte(hsv.saturation),
        to_byte(hsv.value),
    ]
}

// the epsilon absorbs float error on exact multiples of 1/255
fn to_byte(unit: f64) -> u8 {
    (unit * 255.0 + 1e-6).floor().clamp(0.0, 255.0) as u8
}

fn mean_color(image: &DecodedImage) -> [f64; 3] {
    let rgb = image.rgb();
    [0usize, 1, 2].map(|c| mean(rgb.pixels().map(|p| p[c] as f64)))
}
