//! Rule resolution: include/exclude path expressions → permission set.
//!
//! Includes are applied in order, then excludes in order, so an exclude
//! always wins over an include regardless of how the rule lists them.
//!
//! Each include replaces the set's entry for its country instead of merging
//! into it. Two includes under the same country are therefore not
//! cumulative: the later one decides what the country grants.

use tracing::debug;

use super::{LocationPath, PermissionSet, ResolvedPath};
use crate::catalog::{Catalog, CityMap, ProvinceMap};
use crate::error::AccessError;
use crate::models::{LocationLevel, PermissionRule};

/// Resolve a rule against the catalog.
///
/// Never fails: unknown names resolve to the empty code and paths that do
/// not exist in the catalog are skipped.
pub fn resolve(catalog: &Catalog, rule: &PermissionRule) -> PermissionSet {
    let includes = rule
        .includes
        .iter()
        .map(|raw| catalog.resolve_path(&LocationPath::parse(raw)));
    let excludes = rule
        .excludes
        .iter()
        .map(|raw| catalog.resolve_path(&LocationPath::parse(raw)));

    apply(catalog, includes, excludes)
}

/// Resolve a rule, rejecting malformed paths and unknown or ambiguous names.
///
/// On success the result equals [`resolve`] for the same rule.
pub fn resolve_strict(
    catalog: &Catalog,
    rule: &PermissionRule,
) -> Result<PermissionSet, AccessError> {
    let includes = rule
        .includes
        .iter()
        .map(|raw| catalog.try_resolve_path(&LocationPath::parse(raw)))
        .collect::<Result<Vec<_>, _>>()?;
    let excludes = rule
        .excludes
        .iter()
        .map(|raw| catalog.try_resolve_path(&LocationPath::parse(raw)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(apply(catalog, includes, excludes))
}

fn apply<'c, I, E>(catalog: &'c Catalog, includes: I, excludes: E) -> PermissionSet
where
    I: IntoIterator<Item = ResolvedPath<'c>>,
    E: IntoIterator<Item = ResolvedPath<'c>>,
{
    let mut set = PermissionSet::new();

    for path in includes {
        debug!("Include {:?}", path);
        include(catalog, &mut set, &path);
    }

    for path in excludes {
        debug!("Exclude {:?}", path);
        exclude(&mut set, &path);
    }

    debug!(
        "Resolved permission set: {} countries recorded, {} cities granted",
        set.countries().count(),
        set.len()
    );
    set
}

fn include(catalog: &Catalog, set: &mut PermissionSet, path: &ResolvedPath<'_>) {
    let country = path.country;
    match (path.level, path.province, path.city) {
        (Some(LocationLevel::Country), _, _) => {
            set.grant(country, catalog.province_map(country).cloned());
        }
        (Some(LocationLevel::Province), Some(province), _) => {
            if let Some(cities) = catalog.city_map(country, province) {
                let provinces = ProvinceMap::from([(province.to_string(), cities.clone())]);
                set.grant(country, Some(provinces));
            }
        }
        (Some(LocationLevel::City), Some(province), Some(city)) => {
            if let Some(presence) = catalog.city_presence(country, province, city) {
                let cities = CityMap::from([(city.to_string(), presence)]);
                let provinces = ProvinceMap::from([(province.to_string(), cities)]);
                set.grant(country, Some(provinces));
            }
        }
        _ => {}
    }
}

fn exclude(set: &mut PermissionSet, path: &ResolvedPath<'_>) {
    let country = path.country;
    match (path.level, path.province, path.city) {
        (Some(LocationLevel::Country), _, _) => set.remove_country(country),
        (Some(LocationLevel::Province), Some(province), _) => {
            set.remove_province(country, province)
        }
        (Some(LocationLevel::City), Some(province), Some(city)) => {
            set.remove_city(country, province, city)
        }
        _ => {}
    }
}
