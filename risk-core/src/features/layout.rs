//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The classifier was trained on these columns in exactly this order.
//! Permuting them does not raise an error anywhere; predictions are
//! just silently wrong.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Clinical thresholds (0-1) ===
    "high_bp",                 // 0: systolic >= 130 or diastolic >= 80
    "high_chol",               // 1: cholesterol >= 240

    // === Lifestyle (2-4) ===
    "smoker",                  // 2
    "hvy_alcohol_consump",     // 3
    "fruits_veggies",          // 4: 0 / 0.5 / 1

    // === Body & activity (5-7) ===
    "bmi",                     // 5
    "phys_activity",           // 6: 0 - 10 scale
    "heart_disease_or_attack", // 7

    // === Wellbeing (8-11) ===
    "ment_hlth",               // 8: poor mental health days, or flag constant
    "phys_hlth",               // 9: poor physical health days, or flag constant
    "avg_daily_sleep",         // 10
    "healthcare_access",       // 11: trained column is DiffWalk (proxy)

    // === Demographics (12-14) ===
    "income",                  // 12: bracket rank 1-5
    "age",                     // 13: years or 13-level bucket
    "sex",                     // 14

    // === Raw measurements (15-18) ===
    "systolic",                // 15
    "diastolic",               // 16
    "pulse",                   // 17
    "cholesterol",             // 18

    // === Padding (19-20) ===
    "reserved_19",             // 19: always 0
    "reserved_20",             // 20: always 0
];

/// Width of the vector the classifier expects
pub const FEATURE_COUNT: usize = 21;

const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);

/// Positions that are padded with a literal zero
pub const PADDING_FEATURES: &[&str] = &["reserved_19", "reserved_20"];

/// Position of a named column
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

pub fn is_padding(name: &str) -> bool {
    PADDING_FEATURES.contains(&name)
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the version, every column name and whether it is padding.
/// A vector carrying a different hash was built for another classifier.
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0, is_padding(name) as u8]);
    }

    hasher.finalize()
}

/// Layout summary reported by the model status endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub padding: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        let names = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: names(FEATURE_LAYOUT),
            padding: names(PADDING_FEATURES),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// A vector built against another version or column order
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "Feature vector built for layout v{actual_version} ({actual_hash:08x}), \
     classifier expects v{expected_version} ({expected_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    let expected_hash = layout_hash();

    if version == FEATURE_VERSION && hash == expected_hash {
        return Ok(());
    }

    Err(LayoutMismatchError {
        expected_version: FEATURE_VERSION,
        expected_hash,
        actual_version: version,
        actual_hash: hash,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 21);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_feature_names_unique() {
        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            assert_eq!(feature_index(name), Some(i), "duplicate feature name {}", name);
        }
    }

    #[test]
    fn test_padding_is_at_the_tail() {
        for name in PADDING_FEATURES {
            let index = feature_index(name).unwrap();
            assert!(index >= FEATURE_COUNT - PADDING_FEATURES.len());
        }
    }

    #[test]
    fn test_layout_hash_stable() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout_success() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
    }

    #[test]
    fn test_validate_layout_version_mismatch() {
        let err = validate_layout(FEATURE_VERSION + 1, layout_hash()).unwrap_err();
        assert_eq!(err.actual_version, FEATURE_VERSION + 1);
        assert!(err.to_string().contains("classifier expects"));
    }

    #[test]
    fn test_validate_layout_hash_mismatch() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1)).is_err());
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("high_bp"), Some(0));
        assert_eq!(feature_index("bmi"), Some(5));
        assert_eq!(feature_index("age"), Some(13));
        assert_eq!(feature_index("cholesterol"), Some(18));
        assert_eq!(feature_index("nonexistent"), None);
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(0), Some("high_bp"));
        assert_eq!(feature_name(20), Some("reserved_20"));
        assert_eq!(feature_name(FEATURE_COUNT), None);
    }

    #[test]
    fn test_is_padding() {
        assert!(is_padding("reserved_19"));
        assert!(!is_padding("cholesterol"));
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
        assert_eq!(info.hash, layout_hash());
        assert_eq!(info.padding, vec!["reserved_19", "reserved_20"]);
    }
}
