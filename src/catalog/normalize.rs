//! Name normalization shared by catalog building and path lookup.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a human-readable name into its lookup key.
///
/// Uppercases the name and strips all whitespace, so `"Tamil Nadu"`,
/// `"tamilnadu"` and `"TAMIL\tNADU"` share the key `"TAMILNADU"`.
pub fn normalize_name(name: &str) -> String {
    WHITESPACE.replace_all(name, "").to_uppercase()
}
