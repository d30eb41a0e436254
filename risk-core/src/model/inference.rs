//! Risk Model interface
//!
//! The classifier is an opaque scoring oracle: a label and two class
//! probabilities for one feature vector. Implementations are loaded once
//! and shared read-only.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::features::FeatureVector;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    /// Headline shown on the result page
    pub fn message(&self) -> &'static str {
        match self {
            RiskLevel::High => "High risk of diabetes.",
            RiskLevel::Low => "Low risk of diabetes.",
        }
    }
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: u8,
    pub risk: RiskLevel,
    /// [p(no diabetes), p(diabetes)], sums to 1
    pub probabilities: [f32; 2],
    /// Probability of the predicted class
    pub confidence: f32,
    pub inference_time_us: u64,
    pub model: String,
}

impl Prediction {
    pub fn new(label: u8, probabilities: [f32; 2], elapsed: Duration, model: &str) -> Self {
        Self {
            label,
            risk: RiskLevel::from_label(label),
            probabilities,
            confidence: probabilities[label as usize],
            inference_time_us: elapsed.as_micros() as u64,
            model: model.to_string(),
        }
    }

    /// Confidence as a percentage with two decimals, e.g. "87.00%"
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}

/// Model metadata for status endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub path: Option<String>,
    pub sha256: Option<String>,
    pub feature_count: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// RISK MODEL TRAIT
// ============================================================================

pub trait RiskModel: Send + Sync {
    /// Class label, 0 or 1
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError>;

    /// [p0, p1]
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f32; 2], ModelError>;

    fn info(&self) -> ModelInfo;

    /// Validate the layout, then label + probabilities in one result
    fn score(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        features.validate()?;

        let start = Instant::now();
        let label = check_label(self.predict(features)? as i64)?;
        let probabilities = self.predict_proba(features)?;

        Ok(Prediction::new(label, probabilities, start.elapsed(), &self.info().name))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

pub fn check_label(label: i64) -> Result<u8, ModelError> {
    match label {
        0 | 1 => Ok(label as u8),
        other => Err(ModelError::Inference(format!(
            "Expected binary label, got {}",
            other
        ))),
    }
}

/// Rescale two class scores so they sum to 1
pub fn normalize_proba(p: [f32; 2]) -> Result<[f32; 2], ModelError> {
    let sum = p[0] + p[1];

    if !sum.is_finite() || sum <= 0.0 || p.iter().any(|v| *v < 0.0) {
        return Err(ModelError::Inference(format!(
            "Invalid class probabilities {:?}",
            p
        )));
    }

    Ok([p[0] / sum, p[1] / sum])
}

pub fn argmax(p: [f32; 2]) -> u8 {
    if p[1] > p[0] {
        1
    } else {
        0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_VERSION};

    /// Scores by BMI alone
    struct BmiModel;

    impl RiskModel for BmiModel {
        fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError> {
            Ok(argmax(self.predict_proba(features)?))
        }

        fn predict_proba(&self, features: &FeatureVector) -> Result<[f32; 2], ModelError> {
            let bmi = features.get_by_name("bmi").unwrap_or(0.0);
            let p1 = ((bmi - 15.0) / 30.0).clamp(0.0, 1.0);
            Ok([1.0 - p1, p1])
        }

        fn info(&self) -> ModelInfo {
            ModelInfo {
                name: "bmi".to_string(),
                path: None,
                sha256: None,
                feature_count: FEATURE_COUNT,
                loaded_at: chrono::Utc::now(),
            }
        }
    }

    fn with_bmi(bmi: f32) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        values[5] = bmi;
        FeatureVector::from_values(values)
    }

    #[test]
    fn test_score_high() {
        let prediction = BmiModel.score(&with_bmi(39.0)).unwrap();
        assert_eq!(prediction.label, 1);
        assert_eq!(prediction.risk, RiskLevel::High);
        assert!((prediction.confidence - 0.8).abs() < 1e-6);
        assert_eq!(prediction.model, "bmi");
        assert!((prediction.probabilities.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_low() {
        let prediction = BmiModel.score(&with_bmi(21.0)).unwrap();
        assert_eq!(prediction.risk, RiskLevel::Low);
        assert!((prediction.confidence - 0.8).abs() < 1e-6);
        assert_eq!(prediction.confidence_percent(), "80.00%");
    }

    #[test]
    fn test_score_rejects_foreign_layout() {
        let mut vector = with_bmi(30.0);
        vector.version = FEATURE_VERSION + 1;
        assert!(matches!(BmiModel.score(&vector), Err(ModelError::Layout(_))));
    }

    /// Reports a label outside {0, 1}
    struct BrokenLabelModel;

    impl RiskModel for BrokenLabelModel {
        fn predict(&self, _features: &FeatureVector) -> Result<u8, ModelError> {
            Ok(2)
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Result<[f32; 2], ModelError> {
            Ok([0.5, 0.5])
        }

        fn info(&self) -> ModelInfo {
            BmiModel.info()
        }
    }

    #[test]
    fn test_score_rejects_non_binary_label() {
        let result = BrokenLabelModel.score(&with_bmi(25.0));
        assert!(matches!(result, Err(ModelError::Inference(_))));
    }

    #[test]
    fn test_check_label() {
        assert_eq!(check_label(0).unwrap(), 0);
        assert_eq!(check_label(1).unwrap(), 1);
        assert!(check_label(2).is_err());
    }

    #[test]
    fn test_normalize_proba() {
        assert_eq!(normalize_proba([1.0, 3.0]).unwrap(), [0.25, 0.75]);
        assert!(normalize_proba([0.0, 0.0]).is_err());
        assert!(normalize_proba([f32::NAN, 0.5]).is_err());
        assert!(normalize_proba([-0.1, 1.1]).is_err());
    }

    #[test]
    fn test_risk_message() {
        assert_eq!(RiskLevel::from_label(1).message(), "High risk of diabetes.");
        assert_eq!(RiskLevel::from_label(0).message(), "Low risk of diabetes.");
    }
}
