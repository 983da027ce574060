//! Domain errors surfaced by strict resolution.
//!
//! The default resolve/check path never produces these; unknown names
//! degrade to the empty code instead.

use thiserror::Error;

use crate::models::{LocationCode, LocationLevel};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Path expression does not carry 1 to 3 non-empty tokens
    #[error("invalid path expression `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Name not present in the catalog at that level
    #[error("unknown {level} name `{name}`")]
    UnknownName { level: LocationLevel, name: String },

    /// Name registered with more than one code at that level
    #[error("{level} name `{name}` is ambiguous, registered as {codes:?}")]
    AmbiguousName {
        level: LocationLevel,
        name: String,
        codes: Vec<LocationCode>,
    },

    #[error("unknown distributor `{0}`")]
    UnknownDistributor(String),
}

impl AccessError {
    /// Machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::InvalidPath { .. } => "INVALID_PATH",
            AccessError::UnknownName { .. } => "UNKNOWN_NAME",
            AccessError::AmbiguousName { .. } => "AMBIGUOUS_NAME",
            AccessError::UnknownDistributor(_) => "UNKNOWN_DISTRIBUTOR",
        }
    }
}
