//! Resolved permission sets.

use serde::Serialize;
use std::collections::BTreeMap;

use super::ResolvedPath;
use crate::catalog::ProvinceMap;
use crate::models::{LocationCode, LocationLevel};

/// The locations a distributor may operate in, shaped like the catalog.
///
/// A country key may map to `None` when a country-level include named a
/// country the catalog does not hold: the key is recorded but nothing under
/// it is granted, and the country itself does not check as permitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet {
    countries: BTreeMap<LocationCode, Option<ProvinceMap>>,
}

/// One permitted city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrantedCity<'a> {
    pub country: &'a str,
    pub province: &'a str,
    pub city: &'a str,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever the set holds for `country`.
    pub(crate) fn grant(&mut self, country: &str, provinces: Option<ProvinceMap>) {
        self.countries.insert(country.to_string(), provinces);
    }

    pub(crate) fn remove_country(&mut self, country: &str) {
        self.countries.remove(country);
    }

    pub(crate) fn remove_province(&mut self, country: &str, province: &str) {
        if let Some(Some(provinces)) = self.countries.get_mut(country) {
            provinces.remove(province);
        }
    }

    pub(crate) fn remove_city(&mut self, country: &str, province: &str, city: &str) {
        if let Some(cities) = self
            .countries
            .get_mut(country)
            .and_then(Option::as_mut)
            .and_then(|provinces| provinces.get_mut(province))
        {
            cities.remove(city);
        }
    }

    /// True if the country is recorded with a materialized subtree, even an
    /// emptied one.
    pub fn has_country(&self, country: &str) -> bool {
        matches!(self.countries.get(country), Some(Some(_)))
    }

    pub fn has_province(&self, country: &str, province: &str) -> bool {
        self.provinces(country)
            .is_some_and(|provinces| provinces.contains_key(province))
    }

    /// Presence value stored for a city, if the city key is present
    pub fn city_presence(&self, country: &str, province: &str, city: &str) -> Option<bool> {
        self.provinces(country)?.get(province)?.get(city).copied()
    }

    fn provinces(&self, country: &str) -> Option<&ProvinceMap> {
        self.countries.get(country)?.as_ref()
    }

    /// Whether a resolved location path is permitted.
    pub fn contains(&self, path: &ResolvedPath<'_>) -> bool {
        match (path.level, path.province, path.city) {
            (Some(LocationLevel::Country), _, _) => self.has_country(path.country),
            (Some(LocationLevel::Province), Some(province), _) => {
                self.has_province(path.country, province)
            }
            (Some(LocationLevel::City), Some(province), Some(city)) => {
                self.city_presence(path.country, province, city) == Some(true)
            }
            _ => false,
        }
    }

    /// Recorded country keys, including ones that grant nothing
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    /// Every permitted city, ordered by country, province and city code
    pub fn granted(&self) -> impl Iterator<Item = GrantedCity<'_>> {
        self.countries
            .iter()
            .filter_map(|(country, provinces)| provinces.as_ref().map(|p| (country, p)))
            .flat_map(|(country, provinces)| {
                provinces.iter().flat_map(move |(province, cities)| {
                    cities
                        .iter()
                        .filter(|(_, present)| **present)
                        .map(move |(city, _)| GrantedCity {
                            country,
                            province,
                            city,
                        })
                })
            })
    }

    /// Number of permitted cities
    pub fn len(&self) -> usize {
        self.granted().count()
    }

    /// True if no country key is recorded
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
