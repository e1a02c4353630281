pub mod anomaly;
pub mod clustering;
pub mod color;
pub mod core;
pub mod edges;
pub mod orchestrator;
pub mod primitives;
pub mod shape;
pub mod statistics;
pub mod texture;

pub use anomaly::AnomalyDetector;
pub use clustering::{Clustering, KMeans, WeightedPoint};
pub use color::ColorDistributionAnalyzer;
pub use core::FeatureExtractor;
pub use orchestrator::FeatureOrchestrator;
pub use shape::ShapeContourAnalyzer;
pub use statistics::GlobalStatisticsAnalyzer;
pub use texture::TexturePatternAnalyzer;
