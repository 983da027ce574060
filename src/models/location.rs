//! Location hierarchy types for access resolution.

use serde::{Deserialize, Serialize};

/// Opaque short identifier for a country, province, or city.
///
/// Province and city codes are only unique within their parent. Empty codes
/// are accepted and are also what unknown names resolve to.
pub type LocationCode = String;

/// Level of the administrative hierarchy, least specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LocationLevel {
    /// Country (path token count 1)
    Country,
    /// Province / state (path token count 2)
    Province,
    /// City (path token count 3)
    City,
}

impl LocationLevel {
    /// Map a path token count to the level it addresses
    pub fn from_token_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(LocationLevel::Country),
            2 => Some(LocationLevel::Province),
            3 => Some(LocationLevel::City),
            _ => None,
        }
    }

    /// Number of tokens a path at this level carries
    pub fn token_count(&self) -> usize {
        match self {
            LocationLevel::Country => 1,
            LocationLevel::Province => 2,
            LocationLevel::City => 3,
        }
    }

    /// Get all levels in hierarchical order (country first)
    pub fn all() -> &'static [LocationLevel] {
        &[
            LocationLevel::Country,
            LocationLevel::Province,
            LocationLevel::City,
        ]
    }

    /// Get the field name for this level
    pub fn field_name(&self) -> &'static str {
        match self {
            LocationLevel::Country => "country",
            LocationLevel::Province => "province",
            LocationLevel::City => "city",
        }
    }
}

impl std::fmt::Display for LocationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// One row of the reference dataset.
///
/// Field order matches the on-disk column order:
/// `city_code, province_code, country_code, city_name, province_name, country_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub city_code: LocationCode,
    pub province_code: LocationCode,
    pub country_code: LocationCode,
    pub city_name: String,
    pub province_name: String,
    pub country_name: String,
}

impl LocationRecord {
    pub fn new(
        city_code: &str,
        province_code: &str,
        country_code: &str,
        city_name: &str,
        province_name: &str,
        country_name: &str,
    ) -> Self {
        Self {
            city_code: city_code.to_string(),
            province_code: province_code.to_string(),
            country_code: country_code.to_string(),
            city_name: city_name.to_string(),
            province_name: province_name.to_string(),
            country_name: country_name.to_string(),
        }
    }

    /// Code at the given level
    pub fn code(&self, level: LocationLevel) -> &str {
        match level {
            LocationLevel::Country => &self.country_code,
            LocationLevel::Province => &self.province_code,
            LocationLevel::City => &self.city_code,
        }
    }

    /// Human-readable name at the given level
    pub fn name(&self, level: LocationLevel) -> &str {
        match level {
            LocationLevel::Country => &self.country_name,
            LocationLevel::Province => &self.province_name,
            LocationLevel::City => &self.city_name,
        }
    }
}
