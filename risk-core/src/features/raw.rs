//! Raw Input - field name → value as the collector captured it

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

/// A single answer from the form.
///
/// Enumerated choices and free text are both `Text`; the encoder decides
/// per field which one it expects. Text is never parsed as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Integer(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Integer(v as i64)
    }
}

impl From<u16> for RawValue {
    fn from(v: u16) -> Self {
        RawValue::Integer(v as i64)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<f32> for RawValue {
    fn from(v: f32) -> Self {
        RawValue::Float(v as f64)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

/// Mapping from field identifier to raw value. Lives for one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    fields: BTreeMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<RawValue> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Numeric answer. Text is rejected, not parsed.
    pub fn number(&self, field: &str) -> Result<f64, EncodeError> {
        match self.get(field) {
            None => Err(EncodeError::MissingField(field.to_string())),
            Some(RawValue::Integer(v)) => Ok(*v as f64),
            Some(RawValue::Float(v)) if v.is_finite() => Ok(*v),
            Some(_) => Err(EncodeError::InvalidNumber {
                field: field.to_string(),
            }),
        }
    }

    /// Enumerated answer, returned verbatim for table lookup.
    /// A number is never one of the labels.
    pub fn choice(&self, field: &str) -> Result<&str, EncodeError> {
        let value = match self.get(field) {
            None => return Err(EncodeError::MissingField(field.to_string())),
            Some(RawValue::Text(v)) => return Ok(v.as_str()),
            Some(RawValue::Integer(v)) => v.to_string(),
            Some(RawValue::Float(v)) => v.to_string(),
        };

        Err(EncodeError::UnrecognizedCategory {
            field: field.to_string(),
            value,
        })
    }

    /// Optional free-text annotation; empty strings count as absent
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.get(field) {
            Some(RawValue::Text(v)) if !v.trim().is_empty() => Some(v.as_str()),
            _ => None,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = RawInput::new();
        for (k, v) in iter {
            input.insert(k, v);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_accepts_integer_and_float() {
        let raw = RawInput::new().with("age", 30).with("bmi", 22.5);
        assert_eq!(raw.number("age"), Ok(30.0));
        assert_eq!(raw.number("bmi"), Ok(22.5));
    }

    #[test]
    fn test_number_rejects_text() {
        let raw = RawInput::new().with("age", "30");
        assert_eq!(
            raw.number("age"),
            Err(EncodeError::InvalidNumber { field: "age".to_string() })
        );
    }

    #[test]
    fn test_number_rejects_nan() {
        let raw = RawInput::new().with("bmi", f64::NAN);
        assert!(matches!(raw.number("bmi"), Err(EncodeError::InvalidNumber { .. })));
    }

    #[test]
    fn test_missing_field() {
        let raw = RawInput::new();
        assert_eq!(raw.number("pulse"), Err(EncodeError::MissingField("pulse".to_string())));
        assert_eq!(raw.choice("sex"), Err(EncodeError::MissingField("sex".to_string())));
    }

    #[test]
    fn test_choice_rejects_number() {
        let raw = RawInput::new().with("smoking", 1).with("alcohol", 0.5);
        assert_eq!(
            raw.choice("smoking"),
            Err(EncodeError::UnrecognizedCategory {
                field: "smoking".to_string(),
                value: "1".to_string(),
            })
        );
        assert!(matches!(
            raw.choice("alcohol"),
            Err(EncodeError::UnrecognizedCategory { value, .. }) if value == "0.5"
        ));
    }

    #[test]
    fn test_text_blank_is_none() {
        let raw = RawInput::new()
            .with("heart_disease_type", "   ")
            .with("note", "angina");
        assert_eq!(raw.text("heart_disease_type"), None);
        assert_eq!(raw.text("note"), Some("angina"));
        assert_eq!(raw.text("absent"), None);
    }

    #[test]
    fn test_deserialize_json_map() {
        let raw: RawInput = serde_json::from_str(
            r#"{"systolic": 120, "bmi": 22.0, "sex": "Male"}"#,
        )
        .unwrap();

        assert_eq!(raw.get("systolic"), Some(&RawValue::Integer(120)));
        assert_eq!(raw.get("bmi"), Some(&RawValue::Float(22.0)));
        assert_eq!(raw.get("sex"), Some(&RawValue::Text("Male".to_string())));
    }
}
