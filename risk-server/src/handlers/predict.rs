//! Scoring handlers (JSON API)

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use risk_core::features::annotations;
use risk_core::{FeatureVector, Prediction, RawInput};
use uuid::Uuid;

use crate::models::PredictResponse;
use crate::{AppError, AppResult, AppState};

/// Encode + score one submission. Shared by the JSON API and the form page.
pub fn score(state: &AppState, raw: &RawInput) -> AppResult<(FeatureVector, Prediction)> {
    let vector = state.encoder.encode(raw)?;
    let prediction = state.model.score(&vector)?;
    Ok((vector, prediction))
}

pub fn annotation_map(raw: &RawInput) -> BTreeMap<String, String> {
    annotations(raw)
        .into_iter()
        .map(|(field, text)| (field.to_string(), text.to_string()))
        .collect()
}

/// Bodies axum cannot read still get the JSON error shape
fn read_body(body: Result<Json<RawInput>, JsonRejection>) -> AppResult<RawInput> {
    let Json(raw) = body.map_err(|e| AppError::ValidationError(e.body_text()))?;
    Ok(raw)
}

/// Score a raw JSON submission
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let raw = read_body(body)?;
    let submission_id = Uuid::new_v4();
    let (vector, prediction) = score(&state, &raw)?;

    tracing::info!(
        %submission_id,
        label = prediction.label,
        confidence = prediction.confidence,
        inference_us = prediction.inference_time_us,
        "Scored submission"
    );

    Ok(Json(PredictResponse::new(
        submission_id,
        prediction,
        &vector,
        annotation_map(&raw),
    )))
}

/// Encode without scoring, for checking what the model will see
pub async fn encode(
    State(state): State<AppState>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> AppResult<Json<serde_json::Value>> {
    let raw = read_body(body)?;
    let vector = state.encoder.encode(&raw)?;
    Ok(Json(vector.to_log_entry()))
}
