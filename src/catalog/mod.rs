//! Location catalog.
//!
//! Indexes the reference dataset as a country → province → city hierarchy
//! keyed by code, together with per-level name indexes used to turn
//! human-readable path tokens into codes. Built once, read-only afterwards.

mod loader;
mod name_index;
mod normalize;

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::access::{LocationPath, ResolvedPath};
use crate::error::AccessError;
use crate::models::{LocationCode, LocationLevel, LocationRecord};

pub use loader::{load_reference, read_records};
pub use name_index::NameIndex;
pub use normalize::normalize_name;

/// City code → presence
pub type CityMap = BTreeMap<LocationCode, bool>;
/// Province code → cities
pub type ProvinceMap = BTreeMap<LocationCode, CityMap>;

/// Sentinel code returned for names the catalog does not know
pub const UNKNOWN_CODE: &str = "";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    hierarchy: BTreeMap<LocationCode, ProvinceMap>,
    countries: NameIndex,
    provinces: NameIndex,
    cities: NameIndex,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from reference records, in order.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LocationRecord>,
    {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record);
        }

        info!(
            "Catalog built: {} countries, {} provinces, {} cities",
            catalog.country_count(),
            catalog.province_count(),
            catalog.city_count()
        );

        catalog
    }

    /// Register a single reference record.
    ///
    /// Names are normalized and overwrite any earlier code registered under
    /// the same normalized name at that level. Codes are taken as-is.
    pub fn insert(&mut self, record: &LocationRecord) {
        for level in LocationLevel::all() {
            let key = normalize_name(record.name(*level));
            let code = record.code(*level);
            if let Some(previous) = self.names_mut(*level).insert(key.clone(), code) {
                debug!(
                    "{} name '{}' now maps to '{}', shadowing '{}'",
                    level, key, code, previous
                );
            }
        }

        self.hierarchy
            .entry(record.country_code.clone())
            .or_default()
            .entry(record.province_code.clone())
            .or_default()
            .insert(record.city_code.clone(), true);
    }

    /// Name index for a level
    pub fn names(&self, level: LocationLevel) -> &NameIndex {
        match level {
            LocationLevel::Country => &self.countries,
            LocationLevel::Province => &self.provinces,
            LocationLevel::City => &self.cities,
        }
    }

    fn names_mut(&mut self, level: LocationLevel) -> &mut NameIndex {
        match level {
            LocationLevel::Country => &mut self.countries,
            LocationLevel::Province => &mut self.provinces,
            LocationLevel::City => &mut self.cities,
        }
    }

    /// Code registered for `name` at `level`, or [`UNKNOWN_CODE`] if none.
    pub fn code_for_name(&self, level: LocationLevel, name: &str) -> &str {
        self.names(level)
            .get(&normalize_name(name))
            .unwrap_or(UNKNOWN_CODE)
    }

    /// Strict lookup: fails on unknown names and on names that were
    /// registered with more than one code.
    pub fn try_code_for_name(&self, level: LocationLevel, name: &str) -> Result<&str, AccessError> {
        let key = normalize_name(name);
        let index = self.names(level);

        let codes = index.codes(&key);
        if codes.len() > 1 {
            return Err(AccessError::AmbiguousName {
                level,
                name: name.to_string(),
                codes: codes.to_vec(),
            });
        }

        index.get(&key).ok_or_else(|| AccessError::UnknownName {
            level,
            name: name.to_string(),
        })
    }

    /// Normalized names at `level` that were registered with several codes
    pub fn shadowed(&self, level: LocationLevel) -> Vec<&str> {
        self.names(level).shadowed()
    }

    /// Resolve every present token of `path` to a code, degrading unknown
    /// names to [`UNKNOWN_CODE`].
    pub fn resolve_path(&self, path: &LocationPath<'_>) -> ResolvedPath<'_> {
        let lookup = |level: LocationLevel| path.name(level).map(|name| self.code_for_name(level, name));

        ResolvedPath {
            level: path.level(),
            country: lookup(LocationLevel::Country).unwrap_or(UNKNOWN_CODE),
            province: lookup(LocationLevel::Province),
            city: lookup(LocationLevel::City),
        }
    }

    /// Strict variant of [`Catalog::resolve_path`].
    pub fn try_resolve_path(&self, path: &LocationPath<'_>) -> Result<ResolvedPath<'_>, AccessError> {
        let level = path.level().ok_or_else(|| AccessError::InvalidPath {
            path: path.raw().to_string(),
            reason: format!("expected 1 to 3 names, found {}", path.tokens().len()),
        })?;

        if path.tokens().iter().any(|t| normalize_name(t).is_empty()) {
            return Err(AccessError::InvalidPath {
                path: path.raw().to_string(),
                reason: "empty name".to_string(),
            });
        }

        let lookup = |level: LocationLevel| {
            path.name(level)
                .map(|name| self.try_code_for_name(level, name))
                .transpose()
        };

        Ok(ResolvedPath {
            level: Some(level),
            country: lookup(LocationLevel::Country)?.unwrap_or(UNKNOWN_CODE),
            province: lookup(LocationLevel::Province)?,
            city: lookup(LocationLevel::City)?,
        })
    }

    /// Provinces and cities recorded under a country
    pub fn province_map(&self, country: &str) -> Option<&ProvinceMap> {
        self.hierarchy.get(country)
    }

    /// Cities recorded under a (country, province) pair
    pub fn city_map(&self, country: &str, province: &str) -> Option<&CityMap> {
        self.hierarchy.get(country)?.get(province)
    }

    /// Presence value stored for a (country, province, city) triple
    pub fn city_presence(&self, country: &str, province: &str, city: &str) -> Option<bool> {
        self.city_map(country, province)?.get(city).copied()
    }

    pub fn has_country(&self, country: &str) -> bool {
        self.hierarchy.contains_key(country)
    }

    pub fn has_province(&self, country: &str, province: &str) -> bool {
        self.city_map(country, province).is_some()
    }

    pub fn has_city(&self, country: &str, province: &str, city: &str) -> bool {
        self.city_presence(country, province, city).is_some()
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.hierarchy.keys().map(String::as_str)
    }

    pub fn provinces<'s>(&'s self, country: &str) -> impl Iterator<Item = &'s str> {
        self.province_map(country)
            .into_iter()
            .flat_map(|provinces| provinces.keys().map(String::as_str))
    }

    pub fn cities<'s>(&'s self, country: &str, province: &str) -> impl Iterator<Item = &'s str> {
        self.city_map(country, province)
            .into_iter()
            .flat_map(|cities| cities.keys().map(String::as_str))
    }

    pub fn country_count(&self) -> usize {
        self.hierarchy.len()
    }

    pub fn province_count(&self) -> usize {
        self.hierarchy.values().map(BTreeMap::len).sum()
    }

    pub fn city_count(&self) -> usize {
        self.hierarchy
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hierarchy.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::build(&[
            LocationRecord::new("CHI", "IL", "US", "Chicago", "Illinois", "United States"),
            LocationRecord::new("SPI", "IL", "US", "Springfield", "Illinois", "United States"),
            LocationRecord::new("CHE", "TN", "IN", "Chennai", "Tamil Nadu", "India"),
            LocationRecord::new("BLR", "KA", "IN", "Bangalore", "Karnataka", "India"),
        ])
    }

    #[test]
    fn test_build_hierarchy() {
        let catalog = sample();
        assert_eq!(catalog.country_count(), 2);
        assert_eq!(catalog.province_count(), 3);
        assert_eq!(catalog.city_count(), 4);
        assert!(catalog.has_city("US", "IL", "SPI"));
        assert!(catalog.has_province("IN", "KA"));
        assert!(!catalog.has_province("US", "KA"));
        assert_eq!(catalog.city_presence("IN", "TN", "CHE"), Some(true));
        assert_eq!(catalog.cities("US", "IL").collect::<Vec<_>>(), ["CHI", "SPI"]);
        assert_eq!(catalog.provinces("IN").collect::<Vec<_>>(), ["KA", "TN"]);
    }

    #[test]
    fn test_code_for_name_normalizes() {
        let catalog = sample();
        assert_eq!(catalog.code_for_name(LocationLevel::Country, "unitedstates"), "US");
        assert_eq!(catalog.code_for_name(LocationLevel::Province, "TAMIL NADU"), "TN");
        assert_eq!(catalog.code_for_name(LocationLevel::City, "Chennai"), "CHE");
    }

    #[test]
    fn test_unknown_name_is_empty_code() {
        let catalog = sample();
        assert_eq!(catalog.code_for_name(LocationLevel::Country, "Atlantis"), UNKNOWN_CODE);
        // Levels are separate namespaces
        assert_eq!(catalog.code_for_name(LocationLevel::City, "India"), UNKNOWN_CODE);
    }

    #[test]
    fn test_later_record_shadows_name() {
        let mut catalog = sample();
        catalog.insert(&LocationRecord::new(
            "SGF", "MO", "US", "Springfield", "Missouri", "United States",
        ));

        assert_eq!(catalog.code_for_name(LocationLevel::City, "Springfield"), "SGF");
        assert_eq!(catalog.shadowed(LocationLevel::City), vec!["SPRINGFIELD"]);
        assert!(catalog.shadowed(LocationLevel::Country).is_empty());
        // Both cities stay in the hierarchy
        assert!(catalog.has_city("US", "IL", "SPI"));
        assert!(catalog.has_city("US", "MO", "SGF"));
    }

    #[test]
    fn test_try_code_for_name() {
        let mut catalog = sample();
        assert_eq!(catalog.try_code_for_name(LocationLevel::Country, "India"), Ok("IN"));
        assert!(matches!(
            catalog.try_code_for_name(LocationLevel::Country, "Atlantis"),
            Err(AccessError::UnknownName { .. })
        ));

        catalog.insert(&LocationRecord::new(
            "SGF", "MO", "US", "Springfield", "Missouri", "United States",
        ));
        match catalog.try_code_for_name(LocationLevel::City, "springfield") {
            Err(AccessError::AmbiguousName { codes, .. }) => assert_eq!(codes, ["SPI", "SGF"]),
            other => panic!("expected ambiguous name, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_codes_are_accepted() {
        let catalog = Catalog::build(&[LocationRecord::new("", "", "", "Nowhere", "Nowhere", "Nowhere")]);
        assert!(catalog.has_city("", "", ""));
        assert_eq!(catalog.code_for_name(LocationLevel::Country, "Nowhere"), "");
    }

    #[test]
    fn test_resolve_path() {
        let catalog = sample();
        let path = LocationPath::parse("Chennai-Tamil Nadu-India");
        let resolved = catalog.resolve_path(&path);
        assert_eq!(resolved.level, Some(LocationLevel::City));
        assert_eq!(resolved.country, "IN");
        assert_eq!(resolved.province, Some("TN"));
        assert_eq!(resolved.city, Some("CHE"));

        let path = LocationPath::parse("Gotham-India");
        let resolved = catalog.resolve_path(&path);
        assert_eq!(resolved.province, Some(UNKNOWN_CODE));
        assert_eq!(resolved.city, None);
    }

    #[test]
    fn test_try_resolve_path_rejects_bad_shapes() {
        let catalog = sample();
        assert!(matches!(
            catalog.try_resolve_path(&LocationPath::parse("A-B-C-India")),
            Err(AccessError::InvalidPath { .. })
        ));
        assert!(matches!(
            catalog.try_resolve_path(&LocationPath::parse("Chennai--India")),
            Err(AccessError::InvalidPath { .. })
        ));
        assert!(matches!(
            catalog.try_resolve_path(&LocationPath::parse("Gotham-India")),
            Err(AccessError::UnknownName { level: LocationLevel::Province, .. })
        ));
    }

    #[test]
    fn test_catalog_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
    }
}
