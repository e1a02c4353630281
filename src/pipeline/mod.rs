pub mod pipeline;
pub mod services;
pub mod types;

pub use pipeline::PlantHealthAnalyzer;
pub use services::{
    DiagnosisSynthesizer, FeatureOrchestrator, ImageDecoder, PlantHealthReportService,
    PlantHealthService,
};
pub use types::{AnalysisReport, Diagnosis, DiagnosisResult, EncodedImage, FeatureSet};
