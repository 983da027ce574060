//! Distributor access resolution and point queries.
//!
//! A [`PermissionRule`](crate::models::PermissionRule) is resolved against a
//! [`Catalog`](crate::catalog::Catalog) into a [`PermissionSet`], which then
//! answers "is this location permitted?" through [`check`].

mod evaluator;
mod path;
mod permission_set;
mod resolver;

pub use evaluator::{check, check_strict};
pub use path::{LocationPath, ResolvedPath, PATH_SEPARATOR};
pub use permission_set::{GrantedCity, PermissionSet};
pub use resolver::{resolve, resolve_strict};
