//! ONNX Risk Model - ONNX Runtime Integration
//!
//! Chạy classifier đã export sang ONNX (skl2onnx, zipmap tắt).
//! Expected graph: input `[1, 21]` f32, outputs `label` (int64) and
//! `probabilities` (f32, `[1, 2]`). A graph with a single output is
//! treated as probabilities only; the label is then the argmax.

use std::path::Path;
use std::time::Instant;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use super::inference::{
    argmax, check_label, normalize_proba, ModelInfo, Prediction, RiskModel,
};
use crate::error::ModelError;
use crate::features::{FeatureVector, FEATURE_COUNT};

pub const LABEL_OUTPUT: &str = "label";
pub const PROBABILITY_OUTPUT: &str = "probabilities";

/// SHA-256 of the artifact, lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub struct OnnxRiskModel {
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    label_output: Option<String>,
    proba_output: String,
    info: ModelInfo,
}

impl std::fmt::Debug for OnnxRiskModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxRiskModel")
            .field("label_output", &self.label_output)
            .field("proba_output", &self.proba_output)
            .field("info", &self.info)
            .finish()
    }
}

impl OnnxRiskModel {
    /// Load the artifact from disk, optionally verifying its checksum
    pub fn load(path: impl AsRef<Path>, expected_sha256: Option<&str>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        log::info!("Loading ONNX model from: {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| {
            ModelError::Unavailable(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let digest = sha256_hex(&bytes);
        if let Some(expected) = expected_sha256 {
            if !expected.trim().eq_ignore_ascii_case(&digest) {
                return Err(ModelError::Unavailable(format!(
                    "Checksum mismatch for {}: expected {}, got {}",
                    path.display(),
                    expected.trim(),
                    digest
                )));
            }
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        let mut model = Self::from_bytes(&bytes, &name)?;
        model.info.path = Some(path.display().to_string());
        model.info.sha256 = Some(digest);

        log::info!("ONNX model loaded successfully ({} bytes)", bytes.len());
        Ok(model)
    }

    /// Load ONNX model from bytes
    pub fn from_bytes(model_bytes: &[u8], name: &str) -> Result<Self, ModelError> {
        let session = Session::builder()
            .map_err(|e| ModelError::Unavailable(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Unavailable(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| ModelError::Unavailable(format!("Load from memory error: {}", e)))?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let (label_output, proba_output) = pick_outputs(&output_names)?;

        log::debug!(
            "Model outputs: label={:?} probabilities={}",
            label_output,
            proba_output
        );

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            proba_output,
            info: ModelInfo {
                name: name.to_string(),
                path: None,
                sha256: Some(sha256_hex(model_bytes)),
                feature_count: FEATURE_COUNT,
                loaded_at: chrono::Utc::now(),
            },
        })
    }

    /// One session run → (label, normalized probabilities)
    fn run(&self, features: &FeatureVector) -> Result<(u8, [f32; 2]), ModelError> {
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), features.as_slice().to_vec())
            .map_err(|e| ModelError::Inference(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ModelError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ModelError::Inference(format!("Inference failed: {}", e)))?;

        let proba = outputs
            .get(&self.proba_output)
            .ok_or_else(|| ModelError::Inference("No probabilities output".to_string()))?
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Inference(format!("Extract error: {}", e)))?
            .1;
        if proba.len() < 2 {
            return Err(ModelError::Inference(format!(
                "Expected 2 class probabilities, got {}",
                proba.len()
            )));
        }
        let probabilities = normalize_proba([proba[0], proba[1]])?;

        let label = match &self.label_output {
            Some(name) => {
                let label = outputs
                    .get(name)
                    .ok_or_else(|| ModelError::Inference("No label output".to_string()))?
                    .try_extract_tensor::<i64>()
                    .map_err(|e| ModelError::Inference(format!("Extract error: {}", e)))?
                    .1
                    .first()
                    .copied()
                    .ok_or_else(|| ModelError::Inference("Empty label output".to_string()))?;
                check_label(label)?
            }
            None => argmax(probabilities),
        };

        Ok((label, probabilities))
    }
}

/// Label output (optional) and probability output names
fn pick_outputs(names: &[String]) -> Result<(Option<String>, String), ModelError> {
    let by_name = |wanted: &str| names.iter().find(|n| n.as_str() == wanted).cloned();

    match (by_name(LABEL_OUTPUT), by_name(PROBABILITY_OUTPUT)) {
        (label, Some(proba)) => Ok((label, proba)),
        (None, None) => match names {
            [] => Err(ModelError::Unavailable("Model has no outputs".to_string())),
            [proba] => Ok((None, proba.clone())),
            [label, proba, ..] => Ok((Some(label.clone()), proba.clone())),
        },
        (Some(_), None) => Err(ModelError::Unavailable(
            "Model has a label output but no probabilities output".to_string(),
        )),
    }
}

impl RiskModel for OnnxRiskModel {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError> {
        self.run(features).map(|(label, _)| label)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f32; 2], ModelError> {
        self.run(features).map(|(_, proba)| proba)
    }

    fn info(&self) -> ModelInfo {
        self.info.clone()
    }

    fn score(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        features.validate()?;

        let start = Instant::now();
        let (label, probabilities) = self.run(features)?;

        Ok(Prediction::new(label, probabilities, start.elapsed(), &self.info.name))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_pick_outputs_by_name() {
        let picked = pick_outputs(&names(&["probabilities", "label"])).unwrap();
        assert_eq!(picked, (Some("label".to_string()), "probabilities".to_string()));
    }

    #[test]
    fn test_pick_outputs_positional() {
        let picked = pick_outputs(&names(&["output_label", "output_probability"])).unwrap();
        assert_eq!(
            picked,
            (Some("output_label".to_string()), "output_probability".to_string())
        );

        let single = pick_outputs(&names(&["scores"])).unwrap();
        assert_eq!(single, (None, "scores".to_string()));
    }

    #[test]
    fn test_pick_outputs_rejects_unusable_graph() {
        assert!(pick_outputs(&[]).is_err());
        assert!(pick_outputs(&names(&["label"])).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = OnnxRiskModel::load("/nonexistent/diabetes_model_rf.onnx", None).unwrap_err();
        assert!(matches!(err, ModelError::Unavailable(_)));
    }

    #[test]
    fn test_load_checksum_mismatch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really a model").unwrap();

        let err = OnnxRiskModel::load(file.path(), Some("00ff")).unwrap_err();
        match err {
            ModelError::Unavailable(msg) => assert!(msg.contains("Checksum mismatch")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_garbage_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really a model").unwrap();

        let err = OnnxRiskModel::load(file.path(), None).unwrap_err();
        assert!(matches!(err, ModelError::Unavailable(_)));
    }
}
