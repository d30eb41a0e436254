//! Model Module - Risk Model Inference
//!
//! Tách logic inference khỏi feature encoding.
//! Dễ dàng swap model: mọi classifier chỉ cần implement `RiskModel`.

pub mod inference;
pub mod onnx;

// Re-export common types
pub use inference::{ModelInfo, Prediction, RiskLevel, RiskModel};
pub use onnx::{sha256_hex, OnnxRiskModel};
