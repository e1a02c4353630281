use serde::{Deserialize, Serialize};

use super::features::FeatureSet;

/// Severity bucket selected from the unclamped health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthCategory {
    Healthy,
    MinorIssues,
    ModerateSymptoms,
    Severe,
}

impl HealthCategory {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            HealthCategory::Healthy
        } else if score >= 60.0 {
            HealthCategory::MinorIssues
        } else if score >= 40.0 {
            HealthCategory::ModerateSymptoms
        } else {
            HealthCategory::Severe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthCategory::Healthy => "Plant Appears Healthy",
            HealthCategory::MinorIssues => "Minor Health Issues Detected",
            HealthCategory::ModerateSymptoms => "Moderate Disease Symptoms",
            HealthCategory::Severe => "Severe Disease Indicators",
        }
    }

    /// Recommendation placed ahead of the rule-specific ones
    pub fn lead_recommendation(&self) -> Option<&'static str> {
        match self {
            HealthCategory::Healthy => None,
            HealthCategory::MinorIssues => Some("Early intervention recommended"),
            HealthCategory::ModerateSymptoms => Some("Immediate treatment advised"),
            HealthCategory::Severe => Some("Urgent intervention required"),
        }
    }
}

/// Explainable verdict produced by the synthesizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub health_score: f64,
    pub category: HealthCategory,
    /// Fired indicators in rule evaluation order
    pub indicators: Vec<String>,
    pub recommendations: Vec<String>,
    pub disease: String,
    pub recommendation_summary: String,
}

/// Two-field record handed to the calling collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub disease: String,
    pub recommendations: String,
}

impl DiagnosisResult {
    pub fn new(disease: impl Into<String>, recommendations: impl Into<String>) -> Self {
        Self {
            disease: disease.into(),
            recommendations: recommendations.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.disease == "Error" || self.disease == "Analysis Error"
    }
}

/// Full analysis output: extracted features plus the verdict built from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub features: FeatureSet,
    pub diagnosis: Diagnosis,
}

impl AnalysisReport {
    pub fn result(&self) -> DiagnosisResult {
        DiagnosisResult::new(
            self.diagnosis.disease.clone(),
            self.diagnosis.recommendation_summary.clone(),
        )
    }
}
