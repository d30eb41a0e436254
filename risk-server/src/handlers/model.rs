//! Model status handler

use axum::{extract::State, Json};
use risk_core::features::LayoutInfo;

use crate::models::ModelStatusResponse;
use crate::AppState;

pub async fn status(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    let profile = *state.encoder.profile();

    Json(ModelStatusResponse {
        model: state.model.info(),
        layout: LayoutInfo::current(),
        profile,
        required_fields: profile.required_fields(),
    })
}
