use serde::{Deserialize, Serialize};

/// Palette and discoloration signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorFeatures {
    /// Cluster centroids as `[r, g, b]`
    pub dominant_colors: Vec<[f64; 3]>,
    pub green_dominance: f64,
    /// Fraction of dominant colors leaning brown/yellow (red > blue and green > blue)
    pub discoloration_index: f64,
    pub hue_variance: f64,
    pub saturation_mean: f64,
    pub brightness_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureFeatures {
    /// Variance of the Laplacian response
    pub variance: f64,
    pub edge_density: f64,
    /// Standard deviation after a 3x3 closing
    pub texture_contrast: f64,
    pub roughness_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeFeatures {
    pub spot_count: usize,
    pub avg_spot_size: f64,
    pub shape_irregularity: f64,
    pub size_variance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatFeatures {
    pub red: ChannelStats,
    pub green: ChannelStats,
    pub blue: ChannelStats,
    /// Standard deviation across the three channel means
    pub brightness_uniformity: f64,
    /// Spread between the largest and smallest channel mean
    pub color_balance: f64,
}

impl StatFeatures {
    pub fn channels(&self) -> [ChannelStats; 3] {
        [self.red, self.green, self.blue]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFeatures {
    pub dark_lesion_ratio: f64,
    pub bright_discoloration_ratio: f64,
    pub edge_damage_intensity: f64,
    /// Unclamped sum of the three ratios
    pub anomaly_score: f64,
}

impl AnomalyFeatures {
    pub fn zeroed() -> Self {
        Self::default()
    }
}

/// Output of the five extractors; a missing group falls back to synthesizer defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub color: Option<ColorFeatures>,
    pub texture: Option<TextureFeatures>,
    pub shape: Option<ShapeFeatures>,
    pub statistics: Option<StatFeatures>,
    pub anomaly: Option<AnomalyFeatures>,
}
