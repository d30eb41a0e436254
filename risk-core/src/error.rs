//! Error types for the encoder and the risk model.

use thiserror::Error;

use crate::features::layout::LayoutMismatchError;

/// Failures while turning a `RawInput` into a `FeatureVector`.
///
/// Every variant aborts the encode; no partially filled vector escapes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unrecognized value {value:?} for field {field}")]
    UnrecognizedCategory { field: String, value: String },

    #[error("Field {field} must be a finite number")]
    InvalidNumber { field: String },

    // Layout bugs, not user errors
    #[error("Unknown feature name: {0}")]
    UnknownFeature(String),

    #[error("Feature {0} was never assigned")]
    UnfilledFeature(&'static str),
}

impl EncodeError {
    /// Message suitable for showing to the person filling the form
    pub fn user_message(&self) -> String {
        match self {
            EncodeError::MissingField(field) => format!("Please fill in \"{}\".", field),
            EncodeError::UnrecognizedCategory { field, value } => {
                format!("\"{}\" is not a valid answer for \"{}\".", value, field)
            }
            EncodeError::InvalidNumber { field } => {
                format!("The value given for \"{}\" could not be used.", field)
            }
            EncodeError::UnknownFeature(_) | EncodeError::UnfilledFeature(_) => {
                "Internal error while preparing features.".to_string()
            }
        }
    }

    /// True when the error is caused by the submitted data
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            EncodeError::UnknownFeature(_) | EncodeError::UnfilledFeature(_)
        )
    }
}

/// Failures loading or running the risk model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact missing, unreadable or not the expected shape. Fatal at startup.
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),
}
