//! # leafscan
//!
//! Heuristic plant-leaf health analysis. A base64 image goes in, a two-field
//! verdict (`disease`, `recommendations`) comes out, built from five
//! independent feature groups: color distribution, texture, spot contours,
//! global statistics and intensity anomalies.
//!
//! ```rust,no_run
//! let result = leafscan::analyze("data:image/png;base64,iVBORw0KGgo...");
//! println!("{}: {}", result.disease, result.recommendations);
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, ErrorCategory, Result};
pub use pipeline::types::{
    AnalysisReport, AnomalyFeatures, ChannelStats, ColorFeatures, DecodedImage, Diagnosis,
    DiagnosisResult, EncodedImage, FeatureSet, HealthCategory, ShapeFeatures, StatFeatures,
    TextureFeatures,
};
pub use pipeline::{PlantHealthAnalyzer, PlantHealthReportService, PlantHealthService};

/// Analyze a base64 payload (optionally a `data:` URI) with the default configuration
pub fn analyze(payload: &str) -> DiagnosisResult {
    PlantHealthAnalyzer::default().analyze(payload)
}

pub fn analyze_bytes(payload: &[u8]) -> DiagnosisResult {
    PlantHealthAnalyzer::default().analyze_bytes(payload)
}

/// Analyze a JSON tool argument; anything but a string is rejected as invalid input
pub fn analyze_json(payload: &serde_json::Value) -> DiagnosisResult {
    PlantHealthAnalyzer::default().analyze_json(payload)
}
