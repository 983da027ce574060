//! Dash-joined location paths (`City-Province-Country`).

use crate::models::LocationLevel;

pub const PATH_SEPARATOR: char = '-';

/// A path expression split into its name tokens.
///
/// Tokens are ordered most specific first, so the country is always the
/// last token, the province the second to last and the city the third to
/// last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPath<'a> {
    raw: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> LocationPath<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            tokens: raw.split(PATH_SEPARATOR).collect(),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    /// Level addressed by this path, or `None` for token counts outside 1..=3
    pub fn level(&self) -> Option<LocationLevel> {
        LocationLevel::from_token_count(self.tokens.len())
    }

    /// Name token for `level`, counted from the end of the path
    pub fn name(&self, level: LocationLevel) -> Option<&'a str> {
        let offset = level.token_count();
        self.tokens
            .len()
            .checked_sub(offset)
            .map(|idx| self.tokens[idx])
    }
}

/// A path whose name tokens have been resolved to codes.
///
/// `province` and `city` are `None` when the path is not specific enough to
/// carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPath<'c> {
    pub level: Option<LocationLevel>,
    pub country: &'c str,
    pub province: Option<&'c str>,
    pub city: Option<&'c str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_city_path() {
        let path = LocationPath::parse("Chennai-TamilNadu-India");
        assert_eq!(path.level(), Some(LocationLevel::City));
        assert_eq!(path.name(LocationLevel::Country), Some("India"));
        assert_eq!(path.name(LocationLevel::Province), Some("TamilNadu"));
        assert_eq!(path.name(LocationLevel::City), Some("Chennai"));
    }

    #[test]
    fn test_parse_country_path() {
        let path = LocationPath::parse("UnitedStates");
        assert_eq!(path.level(), Some(LocationLevel::Country));
        assert_eq!(path.name(LocationLevel::Country), Some("UnitedStates"));
        assert_eq!(path.name(LocationLevel::Province), None);
        assert_eq!(path.name(LocationLevel::City), None);
    }

    #[test]
    fn test_too_many_tokens_has_no_level() {
        let path = LocationPath::parse("A-B-C-D");
        assert_eq!(path.level(), None);
        // Tokens are still read from the end
        assert_eq!(path.name(LocationLevel::Country), Some("D"));
        assert_eq!(path.name(LocationLevel::City), Some("B"));
    }

    #[test]
    fn test_empty_path_is_single_empty_token() {
        let path = LocationPath::parse("");
        assert_eq!(path.tokens(), [""]);
        assert_eq!(path.level(), Some(LocationLevel::Country));
    }
}
