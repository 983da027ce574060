//! Core data models for access resolution.

pub mod location;
pub mod rule;

pub use location::{LocationCode, LocationLevel, LocationRecord};
pub use rule::PermissionRule;
