//! Tunable parameters for the plant-health pipeline.
//!
//! `AnalysisConfig::default()` carries the standard pipeline constants. A hosting
//! process can override them from a TOML/JSON file and from `LEAFSCAN_*`
//! environment variables (nested keys use `__`, e.g. `LEAFSCAN_COLOR__SEED=7`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

const ENV_PREFIX: &str = "LEAFSCAN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub color: ColorConfig,
    pub texture: TextureConfig,
    pub shape: ShapeConfig,
    pub anomaly: AnomalyConfig,
    /// Run the five extractors on the rayon pool instead of sequentially
    pub parallel_extraction: bool,
}

/// Dominant-color clustering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub max_clusters: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub canny_low: f32,
    pub canny_high: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Contours with area at or below this are not counted as spots
    pub min_spot_area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    pub dark_percentile: f64,
    pub bright_percentile: f64,
    pub canny_low: f32,
    pub canny_high: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            color: ColorConfig::default(),
            texture: TextureConfig::default(),
            shape: ShapeConfig::default(),
            anomaly: AnomalyConfig::default(),
            parallel_extraction: false,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            max_clusters: 5,
            seed: 42,
            n_init: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
        }
    }
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            min_spot_area: 10.0,
        }
    }
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            dark_percentile: 20.0,
            bright_percentile: 80.0,
            canny_low: 30.0,
            canny_high: 100.0,
        }
    }
}

impl AnalysisConfig {
    /// Layer defaults, an optional file, and `LEAFSCAN_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AnalysisConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let loaded: AnalysisConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate().map_err(AnalysisError::InvalidConfig)?;
        Ok(loaded)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.color.max_clusters == 0 {
            return Err("color.max_clusters must be greater than 0".to_string());
        }

        if self.color.n_init == 0 {
            return Err("color.n_init must be greater than 0".to_string());
        }

        if self.color.max_iterations == 0 {
            return Err("color.max_iterations must be greater than 0".to_string());
        }

        if self.texture.canny_low > self.texture.canny_high {
            return Err("texture.canny_low must not exceed texture.canny_high".to_string());
        }

        if self.anomaly.canny_low > self.anomaly.canny_high {
            return Err("anomaly.canny_low must not exceed anomaly.canny_high".to_string());
        }

        let in_range = |p: f64| (0.0..=100.0).contains(&p);
        if !in_range(self.anomaly.dark_percentile) || !in_range(self.anomaly.bright_percentile) {
            return Err("anomaly percentiles must be between 0 and 100".to_string());
        }

        if self.anomaly.dark_percentile >= self.anomaly.bright_percentile {
            return Err("anomaly.dark_percentile must be below anomaly.bright_percentile".to_string());
        }

        if self.shape.min_spot_area < 0.0 {
            return Err("shape.min_spot_area must not be negative".to_string());
        }

        Ok(())
    }

    /// Set the k-means seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.color.seed = seed;
        self
    }

    pub fn with_parallel_extraction(mut self, enabled: bool) -> Self {
        self.parallel_extraction = enabled;
        self
    }
}
