//! Diabetes Risk Core - Feature Encoder & Model Scoring
//!
//! Chuyển dữ liệu sức khỏe tự khai báo thành feature vector cố định
//! và chấm điểm bằng classifier đã train sẵn.
//!
//! ## Layout
//! - `features/` - Raw input, categorical tables, encoder, versioned vector
//! - `model/` - Risk model trait, ONNX implementation
//!
//! ```text
//! RawInput ──encode(profile)──▶ FeatureVector ──RiskModel::score──▶ Prediction
//! ```

pub mod error;
pub mod features;
pub mod model;

// Re-exports for convenience
pub use error::{EncodeError, ModelError};
pub use features::{
    encode, EncoderProfile, FeatureEncoder, FeatureVector, RawInput, RawValue, FEATURE_COUNT,
};
pub use model::{ModelInfo, OnnxRiskModel, Prediction, RiskLevel, RiskModel};
