use tracing::debug;

use crate::pipeline::types::{Diagnosis, FeatureSet, HealthCategory};

const DEFAULT_GREEN_DOMINANCE: f64 = 0.5;
const DEFAULT_BRIGHTNESS_MEAN: f64 = 128.0;
const MAX_LABEL_INDICATORS: usize = 2;
const MAX_RECOMMENDATIONS: usize = 3;
const FALLBACK_RECOMMENDATION: &str = "Consult with agricultural expert for detailed analysis.";
const HEALTHY_RECOMMENDATIONS: [&str; 2] =
    ["Continue current care routine", "Monitor regularly for changes"];

/// Scalar signals the rules read, with documented defaults for missing groups
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthSignals {
    pub green_dominance: f64,
    pub discoloration: f64,
    pub roughness: f64,
    pub spot_count: usize,
    pub anomaly_score: f64,
    pub brightness_mean: f64,
}

impl HealthSignals {
    pub fn from_features(features: &FeatureSet) -> Self {
        let color = features.color.as_ref();
        Self {
            green_dominance: color.map_or(DEFAULT_GREEN_DOMINANCE, |c| c.green_dominance),
            discoloration: color.map_or(0.0, |c| c.discoloration_index),
            roughness: features.texture.as_ref().map_or(0.0, |t| t.roughness_index),
            spot_count: features.shape.as_ref().map_or(0, |s| s.spot_count),
            anomaly_score: features.anomaly.as_ref().map_or(0.0, |a| a.anomaly_score),
            brightness_mean: color.map_or(DEFAULT_BRIGHTNESS_MEAN, |c| c.brightness_mean),
        }
    }
}

/// One diagnostic rule: fires with an indicator, a recommendation and a fixed penalty
struct Rule {
    penalty: f64,
    recommendation: &'static str,
    indicator: fn(&HealthSignals) -> Option<String>,
}

// Evaluation order is significant: it fixes indicator and recommendation order
const RULES: [Rule; 5] = [
    Rule {
        penalty: 20.0,
        recommendation: "Monitor for nutrient deficiencies or fungal infections",
        indicator: |s| {
            (s.discoloration > 0.3).then(|| {
                format!(
                    "Significant discoloration detected ({:.1}%)",
                    s.discoloration * 100.0
                )
            })
        },
    },
    Rule {
        penalty: 15.0,
        recommendation: "Check for pest damage or disease lesions",
        indicator: |s| (s.roughness > 500.0).then(|| "Abnormal leaf texture detected".to_string()),
    },
    Rule {
        penalty: 25.0,
        recommendation: "Apply appropriate fungicides and remove affected leaves",
        indicator: |s| {
            (s.spot_count > 10)
                .then(|| format!("Multiple spots/lesions found ({} detected)", s.spot_count))
        },
    },
    Rule {
        penalty: 10.0,
        recommendation: "Improve growing conditions and air circulation",
        indicator: |s| (s.anomaly_score > 0.1).then(|| "Tissue damage indicators present".to_string()),
    },
    Rule {
        penalty: 10.0,
        recommendation: "Check watering schedule and light conditions",
        indicator: |s| {
            (s.brightness_mean < 100.0)
                .then(|| "Low leaf brightness indicating possible stress".to_string())
        },
    },
];

/// Deterministic rule engine turning feature groups into a diagnosis
pub struct DiagnosisSynthesizer;

impl DiagnosisSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(&self, features: &FeatureSet) -> Diagnosis {
        self.synthesize_signals(&HealthSignals::from_features(features))
    }

    pub fn synthesize_signals(&self, signals: &HealthSignals) -> Diagnosis {
        // not clamped: the score may go negative
        let mut health_score = signals.green_dominance * 100.0;
        let mut indicators = Vec::new();
        let mut recommendations: Vec<String> = Vec::new();

        for rule in &RULES {
            if let Some(indicator) = (rule.indicator)(signals) {
                debug!("Rule fired: {} (-{})", indicator, rule.penalty);
                indicators.push(indicator);
                recommendations.push(rule.recommendation.to_string());
                health_score -= rule.penalty;
            }
        }

        let category = HealthCategory::from_score(health_score);
        match category.lead_recommendation() {
            Some(lead) => recommendations.insert(0, lead.to_string()),
            None if recommendations.is_empty() => {
                recommendations = HEALTHY_RECOMMENDATIONS.map(String::from).to_vec();
            }
            None => {}
        }

        let mut disease = category.label().to_string();
        if !indicators.is_empty() {
            let shown: Vec<&str> = indicators
                .iter()
                .take(MAX_LABEL_INDICATORS)
                .map(String::as_str)
                .collect();
            disease = format!("{}, {}", disease, shown.join(", "));
        }

        let recommendation_summary = if recommendations.is_empty() {
            FALLBACK_RECOMMENDATION.to_string()
        } else {
            recommendations
                .iter()
                .take(MAX_RECOMMENDATIONS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(". ")
        };

        Diagnosis {
            health_score,
            category,
            indicators,
            recommendations,
            disease,
            recommendation_summary,
        }
    }
}

impl Default for DiagnosisSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
