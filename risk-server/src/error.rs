//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use risk_core::{EncodeError, ModelError};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Validation errors (form ranges)
    ValidationError(String),

    // Encoder errors
    Encode(EncodeError),

    // Model errors
    ModelUnavailable(String),
    InferenceError(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Encode(e) if e.is_input_error() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InferenceError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the person using the form
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::Encode(e) => e.user_message(),
            AppError::ModelUnavailable(_) => "Risk model is not available".to_string(),
            AppError::InferenceError(_) => "Prediction failed".to_string(),
            AppError::InternalError(_) => "Internal server error".to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Encode(e) if !e.is_input_error() => {
                tracing::error!("Encoder layout error: {}", e);
            }
            AppError::ModelUnavailable(msg) => tracing::error!("Model unavailable: {}", msg),
            AppError::InferenceError(msg) => tracing::error!("Inference error: {}", msg),
            AppError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
            _ => tracing::debug!("Rejected submission: {}", self.public_message()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status();
        let body = Json(json!({
            "error": self.public_message(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<EncodeError> for AppError {
    fn from(err: EncodeError) -> Self {
        AppError::Encode(err)
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Unavailable(msg) => AppError::ModelUnavailable(msg),
            ModelError::Inference(msg) => AppError::InferenceError(msg),
            ModelError::Layout(e) => AppError::InternalError(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_category_is_unprocessable() {
        let err: AppError = EncodeError::UnrecognizedCategory {
            field: "sex".to_string(),
            value: "Other".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.public_message().contains("Other"));
    }

    #[test]
    fn test_layout_bug_is_internal() {
        let err: AppError = EncodeError::UnfilledFeature("bmi").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_model_errors_map() {
        let err: AppError = ModelError::Unavailable("gone".to_string()).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.public_message(), "Risk model is not available");

        let err: AppError = ModelError::Inference("bad".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
