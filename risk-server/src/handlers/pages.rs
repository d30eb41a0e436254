//! Form and result pages

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    Form,
};
use validator::Validate;

use super::predict::{annotation_map, score};
use crate::error::AppError;
use crate::models::HealthForm;
use crate::views;
use crate::AppState;

pub async fn form(State(state): State<AppState>) -> Html<String> {
    let defaults = state.encoder.default_input();
    Html(views::form_page(state.encoder.profile(), &defaults))
}

/// Score a form submission and render the verdict
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<HealthForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    match submit_inner(&state, form) {
        Ok(html) => (StatusCode::OK, Html(html)),
        Err(err) => {
            let status = err.status();
            let message = err.public_message();
            if status.is_server_error() {
                tracing::error!("Form submission failed: {:?}", err);
            } else {
                tracing::debug!("Form submission rejected: {}", message);
            }
            (status, Html(views::error_page(&message)))
        }
    }
}

fn submit_inner(
    state: &AppState,
    form: Result<Form<HealthForm>, FormRejection>,
) -> Result<String, AppError> {
    let Form(form) = form.map_err(|e| AppError::ValidationError(e.body_text()))?;
    form.validate()?;

    let raw = form.into_raw();
    let (_, prediction) = score(state, &raw)?;

    tracing::info!(
        label = prediction.label,
        confidence = prediction.confidence,
        "Scored form submission"
    );

    let annotations: Vec<(String, String)> = annotation_map(&raw).into_iter().collect();
    Ok(views::result_page(&prediction, &annotations))
}
