use tracing::warn;

use crate::error::{AnalysisError, ErrorCategory, Result};
use crate::pipeline::types::{AnalysisReport, DiagnosisResult};

/// Collapses a pipeline outcome into the two-field record; the only place errors become values
pub fn format_result(outcome: Result<AnalysisReport>) -> DiagnosisResult {
    match outcome {
        Ok(report) => report.result(),
        Err(err) => format_error(&err),
    }
}

pub fn format_error(err: &AnalysisError) -> DiagnosisResult {
    warn!("Image analysis failed: {}", err);
    match err.category() {
        ErrorCategory::InvalidInput | ErrorCategory::Decode => {
            DiagnosisResult::new("Error", err.to_string())
        }
        ErrorCategory::Processing | ErrorCategory::Config => DiagnosisResult::new(
            "Analysis Error",
            format!("Error during image analysis: {err}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_are_plain_errors() {
        let err = AnalysisError::EmptyImage {
            width: 0,
            height: 3,
        };
        let result = format_error(&err);
        assert_eq!(result.disease, "Error");
        assert!(result.recommendations.contains("0x3"));
    }

    #[test]
    fn processing_failures_are_analysis_errors() {
        let result = format_error(&AnalysisError::processing("k-means diverged"));
        assert_eq!(result.disease, "Analysis Error");
        assert_eq!(
            result.recommendations,
            "Error during image analysis: k-means diverged"
        );
    }
}
