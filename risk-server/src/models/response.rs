//! API response models

use std::collections::BTreeMap;

use risk_core::features::{EncoderProfile, LayoutInfo};
use risk_core::{FeatureVector, ModelInfo, Prediction};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub submission_id: Uuid,
    #[serde(flatten)]
    pub prediction: Prediction,
    pub message: &'static str,
    pub confidence_percent: String,
    pub features: serde_json::Value,
    pub layout_hash: u32,
    pub annotations: BTreeMap<String, String>,
}

impl PredictResponse {
    pub fn new(
        submission_id: Uuid,
        prediction: Prediction,
        vector: &FeatureVector,
        annotations: BTreeMap<String, String>,
    ) -> Self {
        Self {
            submission_id,
            message: prediction.risk.message(),
            confidence_percent: prediction.confidence_percent(),
            prediction,
            features: vector.to_log_entry(),
            layout_hash: vector.layout_hash,
            annotations,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub model: ModelInfo,
    pub layout: LayoutInfo,
    pub profile: EncoderProfile,
    pub required_fields: Vec<&'static str>,
}
