//! Feature Encoder - RawInput → FeatureVector
//!
//! Pure and deterministic. Rule set used by every profile:
//! - HighBP: systolic >= 130 OR diastolic >= 80
//! - HighChol: total cholesterol >= 240 mg/dL
//! - Age bucket: clamp(1, 13, floor((age - 18) / 5) + 1)
//! - Derived BMI: weight_kg / height_m², rounded to 1 decimal
//!
//! Numeric ranges are the collector's job; the encoder only rejects
//! values that cannot be numbers at all.

use super::profile::{AgeEncoding, BmiSource, EncoderProfile, HealthDaysSource};
use super::raw::RawInput;
use super::tables::{
    CategoryTable, FRUIT_VEG, ILLNESS_FLAG, INCOME, PHYSICAL_ACTIVITY, SEX, YES_NO,
};
use super::vector::{FeatureVector, FeatureVectorBuilder};
use super::layout::PADDING_FEATURES;
use crate::error::EncodeError;

// ============================================================================
// RULE CONSTANTS
// ============================================================================

pub const HIGH_BP_SYSTOLIC: f64 = 130.0;
pub const HIGH_BP_DIASTOLIC: f64 = 80.0;
pub const HIGH_CHOL_THRESHOLD: f64 = 240.0;

pub const AGE_BUCKET_START: f64 = 18.0;
pub const AGE_BUCKET_WIDTH: f64 = 5.0;
pub const AGE_BUCKET_MAX: u8 = 13;

/// Free-text fields. Kept with the submission, never encoded.
pub const ANNOTATION_FIELDS: &[&str] = &["heart_disease_type"];

// ============================================================================
// RULES
// ============================================================================

pub fn high_bp(systolic: f64, diastolic: f64) -> bool {
    systolic >= HIGH_BP_SYSTOLIC || diastolic >= HIGH_BP_DIASTOLIC
}

pub fn high_chol(cholesterol: f64) -> bool {
    cholesterol >= HIGH_CHOL_THRESHOLD
}

/// 13-level age band: bucket k covers [18 + 5(k-1), 18 + 5k), under 18 is 1, 78+ is 13
pub fn age_bucket(age: f64) -> u8 {
    let bucket = ((age - AGE_BUCKET_START) / AGE_BUCKET_WIDTH).floor() + 1.0;
    bucket.clamp(1.0, AGE_BUCKET_MAX as f64) as u8
}

/// BMI from height in centimetres and weight in kilograms, 1 decimal.
/// `None` when the result is not a finite number (zero height).
pub fn derive_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    bmi.is_finite().then(|| (bmi * 10.0).round() / 10.0)
}

// ============================================================================
// ENCODER
// ============================================================================

/// Encoder bound to one deployment profile
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeatureEncoder {
    profile: EncoderProfile,
}

impl FeatureEncoder {
    pub fn new(profile: EncoderProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &EncoderProfile {
        &self.profile
    }

    pub fn encode(&self, raw: &RawInput) -> Result<FeatureVector, EncodeError> {
        encode(raw, &self.profile)
    }

    /// Input the form starts with for this profile
    pub fn default_input(&self) -> RawInput {
        default_input(&self.profile)
    }
}

/// Map a raw submission to the model's fixed-order vector.
pub fn encode(raw: &RawInput, profile: &EncoderProfile) -> Result<FeatureVector, EncodeError> {
    let systolic = raw.number("systolic")?;
    let diastolic = raw.number("diastolic")?;
    let pulse = raw.number("pulse")?;
    let cholesterol = raw.number("cholesterol")?;

    let bmi = match profile.bmi {
        BmiSource::Entered => raw.number("bmi")?,
        BmiSource::Derived => {
            let height_cm = raw.number("height_cm")?;
            let weight_kg = raw.number("weight_kg")?;
            derive_bmi(height_cm, weight_kg).ok_or_else(|| EncodeError::InvalidNumber {
                field: "height_cm".to_string(),
            })?
        }
    };

    let age = raw.number("age")?;
    let age = match profile.age {
        AgeEncoding::Years => age,
        AgeEncoding::Bucketed => age_bucket(age) as f64,
    };

    let (ment_hlth, phys_hlth) = match profile.health_days {
        HealthDaysSource::Count => (
            raw.number("mental_health_days")?,
            raw.number("physical_health_days")?,
        ),
        HealthDaysSource::Flag => (
            category(raw, "mental_illness", &ILLNESS_FLAG)? as f64,
            category(raw, "physical_illness", &ILLNESS_FLAG)? as f64,
        ),
    };

    let builder = FeatureVectorBuilder::new()
        .flag("high_bp", high_bp(systolic, diastolic))
        .flag("high_chol", high_chol(cholesterol))
        .set("smoker", category(raw, "smoking", &YES_NO)?)
        .set("hvy_alcohol_consump", category(raw, "alcohol", &YES_NO)?)
        .set("fruits_veggies", category(raw, "fruit_veg", &FRUIT_VEG)?)
        .set("bmi", bmi as f32)
        .set("phys_activity", category(raw, "physical_activity", &PHYSICAL_ACTIVITY)?)
        .set("heart_disease_or_attack", category(raw, "heart_disease", &YES_NO)?)
        .set("ment_hlth", ment_hlth as f32)
        .set("phys_hlth", phys_hlth as f32)
        .set("avg_daily_sleep", raw.number("sleep_hours")? as f32)
        .set("healthcare_access", category(raw, "healthcare", &YES_NO)?)
        .set("income", category(raw, "income", &INCOME)?)
        .set("age", age as f32)
        .set("sex", category(raw, "sex", &SEX)?)
        .set("systolic", systolic as f32)
        .set("diastolic", diastolic as f32)
        .set("pulse", pulse as f32)
        .set("cholesterol", cholesterol as f32);

    let vector = PADDING_FEATURES
        .iter()
        .fold(builder, |b, name| b.set(name, 0.0))
        .build()?;

    log::debug!(
        "Encoded {} raw fields into layout v{} ({})",
        raw.len(),
        vector.version,
        profile
    );

    Ok(vector)
}

fn category(raw: &RawInput, field: &str, table: &CategoryTable) -> Result<f32, EncodeError> {
    table.lookup(field, raw.choice(field)?)
}

/// Free-text annotations present in the submission
pub fn annotations(raw: &RawInput) -> Vec<(&'static str, &str)> {
    ANNOTATION_FIELDS
        .iter()
        .filter_map(|field| raw.text(field).map(|text| (*field, text)))
        .collect()
}

// ============================================================================
// DEFAULTS
// ============================================================================

/// Initial form values for a profile.
///
/// Radio questions start on their first option, so heart disease, smoking,
/// alcohol and healthcare all default to "Yes".
pub fn default_input(profile: &EncoderProfile) -> RawInput {
    let mut raw = RawInput::new()
        .with("systolic", 120)
        .with("diastolic", 80)
        .with("pulse", 70)
        .with("cholesterol", 180)
        .with("heart_disease", "Yes")
        .with("age", 30)
        .with("sex", "Male")
        .with("physical_activity", "None")
        .with("smoking", "Yes")
        .with("alcohol", "Yes")
        .with("fruit_veg", "No")
        .with("sleep_hours", 7.0)
        .with("healthcare", "Yes")
        .with("income", "< RM1,000");

    match profile.bmi {
        BmiSource::Entered => raw.insert("bmi", 22.0),
        BmiSource::Derived => {
            raw.insert("height_cm", 170);
            raw.insert("weight_kg", 65);
        }
    }

    match profile.health_days {
        HealthDaysSource::Count => {
            raw.insert("mental_health_days", 0);
            raw.insert("physical_health_days", 0);
        }
        HealthDaysSource::Flag => {
            raw.insert("mental_illness", "No");
            raw.insert("physical_illness", "No");
        }
    }

    raw
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_bp_either_reading() {
        assert!(high_bp(130.0, 70.0));
        assert!(high_bp(110.0, 80.0));
        assert!(!high_bp(129.0, 79.0));
    }

    #[test]
    fn test_high_chol_cutoff() {
        assert!(!high_chol(239.0));
        assert!(high_chol(240.0));
        // 200-239 is borderline, not high
        assert!(!high_chol(210.0));
    }

    #[test]
    fn test_age_bucket_boundaries() {
        assert_eq!(age_bucket(13.0), 1);
        assert_eq!(age_bucket(18.0), 1);
        assert_eq!(age_bucket(22.0), 1);
        assert_eq!(age_bucket(23.0), 2);
        assert_eq!(age_bucket(45.0), 6);
        assert_eq!(age_bucket(77.0), 12);
        assert_eq!(age_bucket(78.0), 13);
        assert_eq!(age_bucket(100.0), 13);
    }

    #[test]
    fn test_derive_bmi_rounds_to_one_decimal() {
        assert_eq!(derive_bmi(170.0, 65.0), Some(22.5));
        assert_eq!(derive_bmi(180.0, 81.0), Some(25.0));
        assert_eq!(derive_bmi(0.0, 70.0), None);
    }

    #[test]
    fn test_annotations_skip_blank() {
        let raw = RawInput::new().with("heart_disease_type", "Angina");
        assert_eq!(annotations(&raw), vec![("heart_disease_type", "Angina")]);

        let blank = RawInput::new().with("heart_disease_type", "");
        assert!(annotations(&blank).is_empty());
    }

    #[test]
    fn test_default_input_has_required_fields() {
        for profile in [
            EncoderProfile::default(),
            EncoderProfile {
                age: AgeEncoding::Bucketed,
                bmi: BmiSource::Derived,
                health_days: HealthDaysSource::Flag,
            },
        ] {
            let raw = default_input(&profile);
            for field in profile.required_fields() {
                assert!(raw.get(field).is_some(), "default input missing {}", field);
            }
        }
    }
}
