//! Configuration module

use std::env;
use std::path::PathBuf;

use risk_core::features::profile::ParseProfileError;
use risk_core::features::{AgeEncoding, BmiSource, EncoderProfile, HealthDaysSource};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: {source}")]
    Profile {
        name: &'static str,
        #[source]
        source: ParseProfileError,
    },

    #[error("PORT must be a port number, got {0:?}")]
    Port(String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// ONNX model artifact
    pub model_path: PathBuf,

    /// Expected SHA-256 of the artifact (hex). Unchecked when absent.
    pub model_sha256: Option<String>,

    /// Page variant this deployment serves
    pub profile: EncoderProfile,

    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::Port(p))?,
            None => 8080,
        };

        let profile = EncoderProfile {
            age: setting(&lookup, "ENCODER_AGE", AgeEncoding::default())?,
            bmi: setting(&lookup, "ENCODER_BMI", BmiSource::default())?,
            health_days: setting(&lookup, "ENCODER_HEALTH_DAYS", HealthDaysSource::default())?,
        };

        Ok(Self {
            port,

            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("models/diabetes_model_rf.onnx")),

            model_sha256: lookup("MODEL_SHA256").filter(|s| !s.trim().is_empty()),

            profile,

            json_logs: lookup("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),

            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn setting<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = ParseProfileError>,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|source| ConfigError::Profile { name, source }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.model_path, PathBuf::from("models/diabetes_model_rf.onnx"));
        assert_eq!(config.model_sha256, None);
        assert_eq!(config.profile, EncoderProfile::default());
        assert!(!config.json_logs);
        assert!(!config.is_production());
    }

    #[test]
    fn test_profile_from_env() {
        let config = config_from(&[
            ("ENCODER_AGE", "bucketed"),
            ("ENCODER_BMI", "derived"),
            ("ENCODER_HEALTH_DAYS", "flag"),
            ("LOG_FORMAT", "JSON"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap();

        assert_eq!(config.profile.age, AgeEncoding::Bucketed);
        assert_eq!(config.profile.bmi, BmiSource::Derived);
        assert_eq!(config.profile.health_days, HealthDaysSource::Flag);
        assert!(config.json_logs);
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_setting_is_an_error() {
        let err = config_from(&[("ENCODER_AGE", "decades")]).unwrap_err();
        assert!(err.to_string().contains("ENCODER_AGE"));

        assert!(matches!(
            config_from(&[("PORT", "eighty")]),
            Err(ConfigError::Port(_))
        ));
    }

    #[test]
    fn test_blank_checksum_ignored() {
        let config = config_from(&[("MODEL_SHA256", "  ")]).unwrap();
        assert_eq!(config.model_sha256, None);
    }
}
