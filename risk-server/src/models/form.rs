//! Health form model
//!
//! What the HTML form posts. Ranges match the sliders on the page; the
//! encoder relies on them being enforced here.

use risk_core::RawInput;
use serde::Deserialize;
use validator::Validate;

/// Slider bounds shown on the page
#[derive(Debug, Clone, Copy)]
pub struct NumericField {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const NUMERIC_FIELDS: &[NumericField] = &[
    NumericField { name: "systolic", label: "Systolic (SYS) mmHg", min: 80.0, max: 200.0, step: 1.0 },
    NumericField { name: "diastolic", label: "Diastolic (DIA) mmHg", min: 40.0, max: 130.0, step: 1.0 },
    NumericField { name: "pulse", label: "Pulse (bpm)", min: 40.0, max: 160.0, step: 1.0 },
    NumericField { name: "cholesterol", label: "Total Cholesterol (mg/dL)", min: 100.0, max: 400.0, step: 1.0 },
    NumericField { name: "age", label: "Age (years)", min: 13.0, max: 100.0, step: 1.0 },
    NumericField { name: "bmi", label: "Body Mass Index (BMI)", min: 10.0, max: 60.0, step: 0.1 },
    NumericField { name: "height_cm", label: "Height (cm)", min: 100.0, max: 250.0, step: 1.0 },
    NumericField { name: "weight_kg", label: "Weight (kg)", min: 20.0, max: 300.0, step: 0.5 },
    NumericField { name: "mental_health_days", label: "Poor mental health days (past 30 days)", min: 0.0, max: 30.0, step: 1.0 },
    NumericField { name: "physical_health_days", label: "Poor physical health days (past 30 days)", min: 0.0, max: 30.0, step: 1.0 },
    NumericField { name: "sleep_hours", label: "Average sleep per night (hours)", min: 0.0, max: 24.0, step: 0.5 },
];

pub fn numeric_field(name: &str) -> Option<&'static NumericField> {
    NUMERIC_FIELDS.iter().find(|f| f.name == name)
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HealthForm {
    #[validate(range(min = 80, max = 200))]
    pub systolic: u16,
    #[validate(range(min = 40, max = 130))]
    pub diastolic: u16,
    #[validate(range(min = 40, max = 160))]
    pub pulse: u16,
    #[validate(range(min = 100, max = 400))]
    pub cholesterol: u16,

    pub heart_disease: String,
    #[validate(length(max = 200))]
    pub heart_disease_type: Option<String>,

    #[validate(range(min = 13, max = 100))]
    pub age: u16,
    pub sex: String,

    #[validate(range(min = 10.0, max = 60.0))]
    pub bmi: Option<f64>,
    #[validate(range(min = 100.0, max = 250.0))]
    pub height_cm: Option<f64>,
    #[validate(range(min = 20.0, max = 300.0))]
    pub weight_kg: Option<f64>,

    pub physical_activity: String,
    pub smoking: String,
    pub alcohol: String,
    pub fruit_veg: String,

    #[validate(range(min = 0, max = 30))]
    pub mental_health_days: Option<u16>,
    #[validate(range(min = 0, max = 30))]
    pub physical_health_days: Option<u16>,
    pub mental_illness: Option<String>,
    pub physical_illness: Option<String>,

    #[validate(range(min = 0.0, max = 24.0))]
    pub sleep_hours: f64,
    pub healthcare: String,
    pub income: String,
}

impl HealthForm {
    /// Hand the answers to the encoder. Absent optional answers stay
    /// absent so the encoder can report them as missing.
    pub fn into_raw(self) -> RawInput {
        let mut raw = RawInput::new()
            .with("systolic", self.systolic)
            .with("diastolic", self.diastolic)
            .with("pulse", self.pulse)
            .with("cholesterol", self.cholesterol)
            .with("heart_disease", self.heart_disease)
            .with("age", self.age)
            .with("sex", self.sex)
            .with("physical_activity", self.physical_activity)
            .with("smoking", self.smoking)
            .with("alcohol", self.alcohol)
            .with("fruit_veg", self.fruit_veg)
            .with("sleep_hours", self.sleep_hours)
            .with("healthcare", self.healthcare)
            .with("income", self.income);

        let numbers = [
            ("bmi", self.bmi),
            ("height_cm", self.height_cm),
            ("weight_kg", self.weight_kg),
            ("mental_health_days", self.mental_health_days.map(f64::from)),
            ("physical_health_days", self.physical_health_days.map(f64::from)),
        ];
        for (field, value) in numbers {
            if let Some(value) = value {
                raw.insert(field, value);
            }
        }

        let texts = [
            ("heart_disease_type", self.heart_disease_type),
            ("mental_illness", self.mental_illness),
            ("physical_illness", self.physical_illness),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                raw.insert(field, value);
            }
        }

        raw
    }
}
