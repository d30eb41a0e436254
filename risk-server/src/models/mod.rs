//! Data models

pub mod form;
pub mod response;

pub use form::*;
pub use response::*;
