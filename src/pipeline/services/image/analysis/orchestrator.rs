//! Fans the decoded image out to the five extractors
use std::time::Instant;

use tracing::debug;

use super::{
    anomaly::AnomalyDetector, color::ColorDistributionAnalyzer, core::FeatureExtractor,
    shape::ShapeContourAnalyzer, statistics::GlobalStatisticsAnalyzer,
    texture::TexturePatternAnalyzer,
};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::pipeline::types::{DecodedImage, FeatureSet};

pub struct FeatureOrchestrator {
    color: ColorDistributionAnalyzer,
    texture: TexturePatternAnalyzer,
    shape: ShapeContourAnalyzer,
    statistics: GlobalStatisticsAnalyzer,
    anomaly: AnomalyDetector,
    parallel: bool,
}

impl FeatureOrchestrator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            color: ColorDistributionAnalyzer::new(config.color.clone()),
            texture: TexturePatternAnalyzer::new(config.texture.clone()),
            shape: ShapeContourAnalyzer::new(config.shape.clone()),
            statistics: GlobalStatisticsAnalyzer::new(),
            anomaly: AnomalyDetector::new(config.anomaly.clone()),
            parallel: config.parallel_extraction,
        }
    }

    /// Run every extractor and join the results; the first failure aborts the analysis
    pub fn extract_all(&self, image: &DecodedImage) -> Result<FeatureSet> {
        let start_time = Instant::now();

        let features = if self.parallel {
            self.extract_parallel(image)?
        } else {
            FeatureSet {
                color: Some(timed(&self.color, image)?),
                texture: Some(timed(&self.texture, image)?),
                shape: Some(timed(&self.shape, image)?),
                statistics: Some(timed(&self.statistics, image)?),
                anomaly: Some(timed(&self.anomaly, image)?),
            }
        };

        debug!(
            "Extracted 5 feature groups in {}us (parallel: {})",
            start_time.elapsed().as_micros(),
            self.parallel
        );
        Ok(features)
    }

    fn extract_parallel(&self, image: &DecodedImage) -> Result<FeatureSet> {
        let (color, (texture, (shape, (statistics, anomaly)))) = rayon::join(
            || timed(&self.color, image),
            || {
                rayon::join(
                    || timed(&self.texture, image),
                    || {
                        rayon::join(
                            || timed(&self.shape, image),
                            || {
                                rayon::join(
                                    || timed(&self.statistics, image),
                                    || timed(&self.anomaly, image),
                                )
                            },
                        )
                    },
                )
            },
        );

        Ok(FeatureSet {
            color: Some(color?),
            texture: Some(texture?),
            shape: Some(shape?),
            statistics: Some(statistics?),
            anomaly: Some(anomaly?),
        })
    }
}

impl Default for FeatureOrchestrator {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

fn timed<E: FeatureExtractor>(extractor: &E, image: &DecodedImage) -> Result<E::Output> {
    let start_time = Instant::now();
    let output = extractor.extract(image);
    debug!(
        "{}: {} in {}us",
        extractor.name(),
        if output.is_ok() { "ok" } else { "failed" },
        start_time.elapsed().as_micros()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn sample_image() -> DecodedImage {
        DecodedImage::new(ImageBuffer::from_fn(40, 40, |x, y| {
            if (x / 5 + y / 7) % 3 == 0 {
                Rgb([120, 90, 30])
            } else {
                Rgb([30, 170 + (x % 5) as u8, 40])
            }
        }))
    }

    #[test]
    fn every_feature_group_is_present() {
        let features = FeatureOrchestrator::default().extract_all(&sample_image()).unwrap();
        assert!(features.color.is_some());
        assert!(features.texture.is_some());
        assert!(features.shape.is_some());
        assert!(features.statistics.is_some());
        assert!(features.anomaly.is_some());
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let image = sample_image();
        let sequential = FeatureOrchestrator::new(&AnalysisConfig::default())
            .extract_all(&image)
            .unwrap();
        let parallel = FeatureOrchestrator::new(&AnalysisConfig::default().with_parallel_extraction(true))
            .extract_all(&image)
            .unwrap();
        assert_eq!(sequential, parallel);
    }
}
