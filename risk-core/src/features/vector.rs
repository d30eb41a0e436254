//! Feature Vector - model input
//!
//! Versioned vector carrying the layout hash it was built against.
//! Construction goes through [`FeatureVectorBuilder`], which refuses to
//! produce a vector with an unassigned position.

use serde::{Deserialize, Serialize};

use super::layout::{
    feature_index, feature_name, layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT,
    FEATURE_LAYOUT, FEATURE_VERSION,
};
use crate::error::EncodeError;

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values with current version.
    ///
    /// Used when replaying a vector that was already encoded and logged.
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_array(&self) -> &[f32; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    pub fn is_compatible(&self) -> bool {
        self.validate().is_ok()
    }

    /// Pairs of (feature name, value) in layout order
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": self
                .named_values()
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

impl From<[f32; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f32; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for creating FeatureVector with named setters.
///
/// Every layout position must be set exactly through its name; `build`
/// reports the first position that was never assigned.
#[derive(Debug, Clone)]
pub struct FeatureVectorBuilder {
    values: [f32; FEATURE_COUNT],
    filled: [bool; FEATURE_COUNT],
    unknown: Option<String>,
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
            filled: [false; FEATURE_COUNT],
            unknown: None,
        }
    }

    /// Set feature by name
    pub fn set(mut self, name: &str, value: f32) -> Self {
        match feature_index(name) {
            Some(index) => {
                self.values[index] = value;
                self.filled[index] = true;
            }
            None => {
                if self.unknown.is_none() {
                    self.unknown = Some(name.to_string());
                }
            }
        }
        self
    }

    /// Set a 0/1 indicator
    pub fn flag(self, name: &str, on: bool) -> Self {
        self.set(name, if on { 1.0 } else { 0.0 })
    }

    pub fn build(self) -> Result<FeatureVector, EncodeError> {
        if let Some(name) = self.unknown {
            return Err(EncodeError::UnknownFeature(name));
        }

        if let Some(name) = self
            .filled
            .iter()
            .position(|filled| !filled)
            .and_then(feature_name)
        {
            return Err(EncodeError::UnfilledFeature(name));
        }

        Ok(FeatureVector::from_values(self.values))
    }
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn full_builder() -> FeatureVectorBuilder {
        FEATURE_LAYOUT
            .iter()
            .enumerate()
            .fold(FeatureVectorBuilder::new(), |b, (i, name)| b.set(name, i as f32))
    }

    #[test]
    fn test_builder_fills_in_layout_order() {
        let vector = full_builder().build().unwrap();
        for i in 0..FEATURE_COUNT {
            assert_eq!(vector.get(i), Some(i as f32));
        }
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash());
    }

    #[test]
    fn test_builder_rejects_unfilled_position() {
        let builder = FEATURE_LAYOUT
            .iter()
            .filter(|name| **name != "bmi")
            .fold(FeatureVectorBuilder::new(), |b, name| b.set(name, 1.0));

        assert_eq!(builder.build(), Err(EncodeError::UnfilledFeature("bmi")));
    }

    #[test]
    fn test_builder_rejects_unknown_name() {
        let result = full_builder().set("glucose", 5.0).build();
        assert_eq!(result, Err(EncodeError::UnknownFeature("glucose".to_string())));
    }

    #[test]
    fn test_flag() {
        let vector = full_builder().flag("high_bp", true).flag("sex", false).build().unwrap();
        assert_eq!(vector.get_by_name("high_bp"), Some(1.0));
        assert_eq!(vector.get_by_name("sex"), Some(0.0));
    }

    #[test]
    fn test_feature_vector_validation() {
        let mut vector = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        assert!(vector.is_compatible());

        vector.version = FEATURE_VERSION + 1;
        assert!(vector.validate().is_err());
    }

    #[test]
    fn test_to_log_entry() {
        let vector = full_builder().build().unwrap();
        let log = vector.to_log_entry();

        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert!(log["layout_hash"].as_u64().is_some());
        assert_eq!(log["named_values"]["age"], 13.0);
        assert_eq!(log["values"].as_array().unwrap().len(), FEATURE_COUNT);
    }
}
