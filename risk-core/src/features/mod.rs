//! Features Module - Feature Encoding Engine
//!
//! Tách logic mã hóa features khỏi form và model.
//! Layout là nguồn sự thật duy nhất cho thứ tự cột.

pub mod encoder;
pub mod layout;
pub mod profile;
pub mod raw;
pub mod tables;
pub mod vector;


// Re-export common types
pub use encoder::{annotations, default_input, encode, FeatureEncoder};
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use profile::{AgeEncoding, BmiSource, EncoderProfile, HealthDaysSource};
pub use raw::{RawInput, RawValue};
pub use vector::{FeatureVector, FeatureVectorBuilder};
