use thiserror::Error;

/// Result alias used throughout the analysis pipeline
pub type Result<T> = std::result::Result<T, AnalysisError>;

// Main analysis error type

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Invalid base64 image data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Unable to process the uploaded image: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("Unable to process the uploaded image: raster is {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("{0}")]
    Processing(String),
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse error classes surfaced at the result boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    Decode,
    Processing,
    Config,
}

impl AnalysisError {
    pub fn invalid_input() -> Self {
        Self::InvalidInput("Invalid image data provided. Please upload a valid image.".to_string())
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::InvalidInput(_) => ErrorCategory::InvalidInput,
            AnalysisError::InvalidBase64(_)
            | AnalysisError::ImageDecode(_)
            | AnalysisError::EmptyImage { .. } => ErrorCategory::Decode,
            AnalysisError::Processing(_) => ErrorCategory::Processing,
            AnalysisError::Config(_) | AnalysisError::InvalidConfig(_) => ErrorCategory::Config,
        }
    }
}
