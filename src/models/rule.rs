//! Distributor permission rules.

use serde::{Deserialize, Serialize};

/// A distributor's include/exclude path expressions.
///
/// Each entry is a dash-joined path, most specific first and country last:
/// `"City-Province-Country"`, `"Province-Country"` or `"Country"`.
/// Includes are applied in order before any exclude.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl PermissionRule {
    pub fn new<I, E, S, T>(includes: I, excludes: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            includes: includes.into_iter().map(Into::into).collect(),
            excludes: excludes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}
