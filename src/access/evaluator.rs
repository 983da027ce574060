//! Point queries against a resolved permission set.

use super::{LocationPath, PermissionSet};
use crate::catalog::Catalog;
use crate::error::AccessError;

/// Whether `location` (`City-Province-Country`, `Province-Country` or
/// `Country`) is permitted by `set`.
///
/// Names are resolved through the catalog; unknown names and paths with
/// more than three names are never permitted.
pub fn check(catalog: &Catalog, set: &PermissionSet, location: &str) -> bool {
    let path = LocationPath::parse(location);
    set.contains(&catalog.resolve_path(&path))
}

/// Like [`check`], but rejects malformed paths and unknown or ambiguous names.
pub fn check_strict(
    catalog: &Catalog,
    set: &PermissionSet,
    location: &str,
) -> Result<bool, AccessError> {
    let path = LocationPath::parse(location);
    Ok(set.contains(&catalog.try_resolve_path(&path)?))
}
