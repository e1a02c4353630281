use super::core::FeatureExtractor;
use super::primitives::{mean, std_dev};
use crate::error::Result;
use crate::pipeline::types::{ChannelStats, DecodedImage, StatFeatures};

/// Global per-channel statistics of the RGB raster
pub struct GlobalStatisticsAnalyzer;

impl GlobalStatisticsAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn channel(image: &DecodedImage, channel: usize) -> ChannelStats {
        let samples = image.rgb().as_raw().iter().skip(channel).step_by(3);
        let (min, max) = samples
            .clone()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let values = samples.map(|&v| v as f64);

        ChannelStats {
            mean: mean(values.clone()),
            std_dev: std_dev(values),
            min,
            max,
        }
    }
}

impl Default for GlobalStatisticsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for GlobalStatisticsAnalyzer {
    type Output = StatFeatures;

    fn extract(&self, image: &DecodedImage) -> Result<StatFeatures> {
        let [red, green, blue] = [0, 1, 2].map(|c| Self::channel(image, c));
        let means = [red.mean, green.mean, blue.mean];

        let highest = means.iter().copied().fold(f64::MIN, f64::max);
        let lowest = means.iter().copied().fold(f64::MAX, f64::min);

        Ok(StatFeatures {
            red,
            green,
            blue,
            brightness_uniformity: std_dev(means),
            color_balance: highest - lowest,
        })
    }

    fn name(&self) -> &'static str {
        "GlobalStatisticsAnalyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn per_channel_statistics() {
        let image = DecodedImage::new(ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([10, 100, 0])
            } else {
                Rgb([30, 100, 50])
            }
        }));
        let stats = GlobalStatisticsAnalyzer::new().extract(&image).unwrap();

        assert_eq!(stats.red.mean, 20.0);
        assert_eq!(stats.red.std_dev, 10.0);
        assert_eq!((stats.red.min, stats.red.max), (10, 30));
        assert_eq!(stats.green.std_dev, 0.0);
        assert_eq!((stats.blue.min, stats.blue.max), (0, 50));
        // channel means 20, 100, 25
        assert_eq!(stats.color_balance, 80.0);
        let mu = (20.0 + 100.0 + 25.0) / 3.0;
        let expected = (((20.0f64 - mu).powi(2) + (100.0f64 - mu).powi(2) + (25.0f64 - mu).powi(2)) / 3.0).sqrt();
        assert!((stats.brightness_uniformity - expected).abs() < 1e-9);
    }
}
