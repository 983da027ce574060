//! Normalized-name to code lookup for a single hierarchy level.

use hashbrown::HashMap;

use crate::models::LocationCode;

/// Name index for one level. Later registrations of the same normalized
/// name overwrite earlier ones; every distinct code is still remembered so
/// the shadowing can be reported.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    current: HashMap<String, LocationCode>,
    /// Distinct codes seen per normalized name, in first-seen order
    seen: HashMap<String, Vec<LocationCode>>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `code` under an already-normalized `key`.
    ///
    /// Returns the code that was shadowed, if the key previously mapped to a
    /// different code.
    pub fn insert(&mut self, key: String, code: &str) -> Option<LocationCode> {
        let codes = self.seen.entry(key.clone()).or_default();
        if !codes.iter().any(|c| c == code) {
            codes.push(code.to_string());
        }

        match self.current.insert(key, code.to_string()) {
            Some(previous) if previous != code => Some(previous),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.current.get(key).map(String::as_str)
    }

    /// All distinct codes ever registered under `key`
    pub fn codes(&self, key: &str) -> &[LocationCode] {
        self.seen.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Normalized names registered with more than one distinct code, sorted
    pub fn shadowed(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .seen
            .iter()
            .filter(|(_, codes)| codes.len() > 1)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut index = NameIndex::new();
        assert_eq!(index.insert("SPRINGFIELD".into(), "SPI"), None);
        assert_eq!(
            index.insert("SPRINGFIELD".into(), "SGF"),
            Some("SPI".to_string())
        );
        assert_eq!(index.get("SPRINGFIELD"), Some("SGF"));
        assert_eq!(index.codes("SPRINGFIELD"), ["SPI", "SGF"]);
        assert_eq!(index.shadowed(), vec!["SPRINGFIELD"]);
    }

    #[test]
    fn test_same_code_is_not_shadowing() {
        let mut index = NameIndex::new();
        index.insert("INDIA".into(), "IN");
        assert_eq!(index.insert("INDIA".into(), "IN"), None);
        assert_eq!(index.codes("INDIA"), ["IN"]);
        assert!(index.shadowed().is_empty());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let index = NameIndex::new();
        assert_eq!(index.get("ATLANTIS"), None);
        assert!(index.codes("ATLANTIS").is_empty());
        assert!(index.is_empty());
    }
}
