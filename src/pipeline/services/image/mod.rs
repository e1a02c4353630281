pub mod analysis; // Five independent feature extractors

pub use analysis::{FeatureExtractor, FeatureOrchestrator};
