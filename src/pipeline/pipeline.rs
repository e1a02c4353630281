use std::time::Instant;

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::pipeline::services::{
    decoder::ImageDecoder, formatter, image::FeatureOrchestrator,
    synthesizer::DiagnosisSynthesizer,
};
use crate::pipeline::types::{
    AnalysisReport, DecodedImage, DiagnosisResult, EncodedImage, FeatureSet,
};

/// Decoder -> extractors -> synthesizer -> formatter, holding no per-request state.
///
/// Constructed once by the hosting process and shared by reference.
pub struct PlantHealthAnalyzer {
    decoder: ImageDecoder,
    extractors: FeatureOrchestrator,
    synthesizer: DiagnosisSynthesizer,
    config: AnalysisConfig,
}

impl PlantHealthAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate().map_err(AnalysisError::InvalidConfig)?;

        Ok(Self {
            decoder: ImageDecoder::new(),
            extractors: FeatureOrchestrator::new(&config),
            synthesizer: DiagnosisSynthesizer::new(),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a base64 payload; never fails, errors become an error record
    pub fn analyze(&self, payload: &str) -> DiagnosisResult {
        formatter::format_result(self.analyze_report(&EncodedImage::new(payload)))
    }

    /// Bytes must be UTF-8 base64 text
    pub fn analyze_bytes(&self, payload: &[u8]) -> DiagnosisResult {
        match std::str::from_utf8(payload) {
            Ok(text) => self.analyze(text),
            Err(_) => formatter::format_error(&AnalysisError::invalid_input()),
        }
    }

    /// Tool-boundary entry: only a JSON string is a valid payload
    pub fn analyze_json(&self, payload: &serde_json::Value) -> DiagnosisResult {
        match payload.as_str() {
            Some(text) => self.analyze(text),
            None => formatter::format_error(&AnalysisError::invalid_input()),
        }
    }

    pub fn analyze_report(&self, encoded: &EncodedImage) -> Result<AnalysisReport> {
        let request_id = Uuid::new_v4();
        let start_time = Instant::now();
        debug!(%request_id, "Starting plant health analysis");

        let image = self.decoder.decode(encoded)?;
        let report = self.report_for(&image)?;

        info!(
            %request_id,
            "Diagnosis: {} (score {:.1}, {} indicators) in {}us",
            report.diagnosis.category.label(),
            report.diagnosis.health_score,
            report.diagnosis.indicators.len(),
            start_time.elapsed().as_micros()
        );
        Ok(report)
    }

    pub fn report_for(&self, image: &DecodedImage) -> Result<AnalysisReport> {
        let features = self.extract_features(image)?;
        let diagnosis = self.synthesizer.synthesize(&features);
        Ok(AnalysisReport {
            features,
            diagnosis,
        })
    }

    pub fn extract_features(&self, image: &DecodedImage) -> Result<FeatureSet> {
        self.extractors.extract_all(image)
    }
}

impl Default for PlantHealthAnalyzer {
    fn default() -> Self {
        Self {
            decoder: ImageDecoder::new(),
            extractors: FeatureOrchestrator::default(),
            synthesizer: DiagnosisSynthesizer::new(),
            config: AnalysisConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn rejects_invalid_config() {
        let mut config = AnalysisConfig::default();
        config.color.n_init = 0;
        assert!(matches!(
            PlantHealthAnalyzer::new(config),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_string_json_is_invalid_input() {
        let analyzer = PlantHealthAnalyzer::default();
        let result = analyzer.analyze_json(&serde_json::json!(42));
        assert_eq!(result.disease, "Error");
        assert!(result.recommendations.contains("Invalid image data"));
    }

    #[test]
    fn non_utf8_bytes_are_invalid_input() {
        let result = PlantHealthAnalyzer::default().analyze_bytes(&[0xff, 0xfe, 0x00]);
        assert_eq!(result.disease, "Error");
        assert!(result.recommendations.contains("Invalid image data"));
    }

    #[test]
    fn report_for_decoded_image() {
        let image = DecodedImage::new(ImageBuffer::from_pixel(16, 16, Rgb([20, 230, 20])));
        let report = PlantHealthAnalyzer::default().report_for(&image).unwrap();
        assert_eq!(report.result().disease, "Plant Appears Healthy");
    }
}
