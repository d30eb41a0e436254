//! Encoder Profile - which page variant a deployment serves
//!
//! The variants collect different fields for the same column. A deployment
//! picks one profile at startup and keeps it; the vector layout never changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the `age` column is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeEncoding {
    /// Age in years, as entered
    #[default]
    Years,
    /// 13-level ordinal, 5-year bands starting at 18 (1 = 18-22, 13 = 78+)
    Bucketed,
}

/// Where the `bmi` column comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiSource {
    /// `bmi` field entered directly
    #[default]
    Entered,
    /// Computed from `height_cm` and `weight_kg`
    Derived,
}

/// How `ment_hlth` / `phys_hlth` are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthDaysSource {
    /// 0-30 day counts
    #[default]
    Count,
    /// Yes/No illness question mapped to a constant
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncoderProfile {
    #[serde(default)]
    pub age: AgeEncoding,
    #[serde(default)]
    pub bmi: BmiSource,
    #[serde(default)]
    pub health_days: HealthDaysSource,
}

impl EncoderProfile {
    /// Raw fields this profile needs, in form order
    pub fn required_fields(&self) -> Vec<&'static str> {
        let mut fields = vec![
            "systolic",
            "diastolic",
            "pulse",
            "cholesterol",
            "heart_disease",
            "age",
            "sex",
        ];

        match self.bmi {
            BmiSource::Entered => fields.push("bmi"),
            BmiSource::Derived => fields.extend(["height_cm", "weight_kg"]),
        }

        fields.extend(["physical_activity", "smoking", "alcohol", "fruit_veg"]);

        match self.health_days {
            HealthDaysSource::Count => {
                fields.extend(["mental_health_days", "physical_health_days"])
            }
            HealthDaysSource::Flag => fields.extend(["mental_illness", "physical_illness"]),
        }

        fields.extend(["sleep_hours", "healthcare", "income"]);
        fields
    }
}

impl fmt::Display for EncoderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "age={} bmi={} health_days={}",
            self.age, self.bmi, self.health_days
        )
    }
}

// ============================================================================
// STRING FORMS (config / env)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProfileError {
    pub setting: &'static str,
    pub value: String,
}

impl fmt::Display for ParseProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} setting: {:?}", self.setting, self.value)
    }
}

impl std::error::Error for ParseProfileError {}

macro_rules! string_enum {
    ($ty:ident, $setting:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseProfileError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    _ => Err(ParseProfileError {
                        setting: $setting,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum!(AgeEncoding, "age", { Years => "years", Bucketed => "bucketed" });
string_enum!(BmiSource, "bmi", { Entered => "entered", Derived => "derived" });
string_enum!(HealthDaysSource, "health_days", { Count => "count", Flag => "flag" });
