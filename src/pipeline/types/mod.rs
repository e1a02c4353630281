mod decoded_image;
mod diagnosis;
mod encoded_image;
mod features;

pub use decoded_image::DecodedImage;
pub use diagnosis::{AnalysisReport, Diagnosis, DiagnosisResult, HealthCategory};
pub use encoded_image::EncodedImage;
pub use features::{
    AnomalyFeatures, ChannelStats, ColorFeatures, FeatureSet, ShapeFeatures, StatFeatures,
    TextureFeatures,
};
