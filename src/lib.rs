//! Territory - distributor access rights over a country → province → city hierarchy
//!
//! This library provides the location catalog, rule resolution and point
//! queries shared by the check and serve binaries.

pub mod access;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;

pub use access::{check, check_strict, resolve, resolve_strict, PermissionSet};
pub use catalog::Catalog;
pub use error::AccessError;
pub use models::{LocationLevel, LocationRecord, PermissionRule};
