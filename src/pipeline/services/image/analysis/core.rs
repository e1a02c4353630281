use crate::error::Result;
use crate::pipeline::types::DecodedImage;

/// One independent feature group computed from the decoded raster.
///
/// Implementations read the image only; they never observe each other's output.
pub trait FeatureExtractor: Send + Sync {
    type Output: Send;

    fn extract(&self, image: &DecodedImage) -> Result<Self::Output>;
    fn name(&self) -> &'static str;
}
