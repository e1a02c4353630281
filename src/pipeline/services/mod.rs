pub mod decoder;
pub mod formatter;
pub mod health_service;
pub mod image;
pub mod synthesizer;

pub use decoder::ImageDecoder;
pub use health_service::{PlantHealthReportService, PlantHealthService};
pub use self::image::analysis::FeatureOrchestrator;
pub use synthesizer::{DiagnosisSynthesizer, HealthSignals};
