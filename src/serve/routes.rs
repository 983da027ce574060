//! HTTP handlers for the query server.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use territory::access::{check, check_strict, resolve, resolve_strict, PermissionSet};
use territory::config::Config;
use territory::{AccessError, Catalog, PermissionRule};

/// Application state shared across handlers
pub struct AppState {
    pub catalog: Catalog,
    pub config: Config,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    fn resolve(&self, rule: &PermissionRule) -> Result<PermissionSet, AccessError> {
        if self.config.global.strict {
            resolve_strict(&self.catalog, rule)
        } else {
            Ok(resolve(&self.catalog, rule))
        }
    }

    fn check(&self, set: &PermissionSet, location: &str) -> Result<bool, AccessError> {
        if self.config.global.strict {
            check_strict(&self.catalog, set, location)
        } else {
            Ok(check(&self.catalog, set, location))
        }
    }
}

type ApiError = (StatusCode, String);

fn reject(err: AccessError) -> ApiError {
    warn!("Request rejected: {}", err);
    let status = match err {
        AccessError::UnknownDistributor(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, format!("{}: {}", err.code(), err))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    countries: usize,
    provinces: usize,
    cities: usize,
    distributors: usize,
    loaded_at: DateTime<Utc>,
}

/// Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let catalog = &state.catalog;
    Json(HealthResponse {
        status: if catalog.is_empty() { "degraded" } else { "ok" },
        countries: catalog.country_count(),
        provinces: catalog.province_count(),
        cities: catalog.city_count(),
        distributors: state.config.distributors.len(),
        loaded_at: state.loaded_at,
    })
}

#[derive(Deserialize)]
pub struct CheckQueryParams {
    /// Distributor name from the config file
    distributor: String,
    /// Location path, e.g. "Chennai-TamilNadu-India"
    location: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CheckResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    distributor: Option<String>,
    location: String,
    allowed: bool,
}

/// Check a configured distributor against a location
pub async fn check_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CheckQueryParams>,
) -> Result<Json<CheckResponse>, ApiError> {
    let rule = state.config.rule_for(&params.distributor).map_err(reject)?;
    let set = state.resolve(&rule).map_err(reject)?;
    let allowed = state.check(&set, &params.location).map_err(reject)?;

    Ok(Json(CheckResponse {
        distributor: Some(params.distributor),
        location: params.location,
        allowed,
    }))
}

#[derive(Deserialize)]
pub struct CheckRuleRequest {
    #[serde(flatten)]
    rule: PermissionRule,
    location: String,
}

/// Check an inline rule against a location
pub async fn check_rule_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckRuleRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    let set = state.resolve(&request.rule).map_err(reject)?;
    let allowed = state.check(&set, &request.location).map_err(reject)?;

    Ok(Json(CheckResponse {
        distributor: None,
        location: request.location,
        allowed,
    }))
}

#[derive(Debug, Serialize)]
pub struct GrantedLocation {
    country: String,
    province: String,
    city: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    count: usize,
    granted: Vec<GrantedLocation>,
    permissions: PermissionSet,
}

/// Resolve an inline rule into its permitted cities
pub async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Json(rule): Json<PermissionRule>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let set = state.resolve(&rule).map_err(reject)?;
    let granted: Vec<GrantedLocation> = set
        .granted()
        .map(|g| GrantedLocation {
            country: g.country.to_string(),
            province: g.province.to_string(),
            city: g.city.to_string(),
        })
        .collect();

    Ok(Json(ResolveResponse {
        count: granted.len(),
        granted,
        permissions: set,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use territory::LocationRecord;

    fn state(strict: bool) -> Arc<AppState> {
        let catalog = Catalog::build(&[
            LocationRecord::new("CHI", "IL", "US", "Chicago", "Illinois", "UnitedStates"),
            LocationRecord::new("CHE", "TN", "IN", "Chennai", "TamilNadu", "India"),
            LocationRecord::new("BLR", "KA", "IN", "Bangalore", "Karnataka", "India"),
            LocationRecord::new("TIR", "AP", "IN", "Tirupati", "AndhraPradesh", "India"),
        ]);
        let mut config = Config::parse(
            r#"
[global]
reference = "cities.csv"

[[distributors]]
name = "distributor1"
includes = ["Tirupati-AndhraPradesh-India", "UnitedStates"]
excludes = ["Karnataka-India", "Chennai-TamilNadu-India"]
"#,
        )
        .unwrap();
        config.global.strict = strict;

        Arc::new(AppState {
            catalog,
            config,
            loaded_at: Utc::now(),
        })
    }

    fn query(distributor: &str, location: &str) -> Query<CheckQueryParams> {
        Query(CheckQueryParams {
            distributor: distributor.to_string(),
            location: location.to_string(),
        })
    }

    #[tokio::test]
    async fn test_check_configured_distributor() {
        let Json(response) = check_handler(
            State(state(false)),
            query("distributor1", "Chicago-Illinois-UnitedStates"),
        )
        .await
        .unwrap();
        assert!(response.allowed);

        let Json(response) = check_handler(
            State(state(false)),
            query("distributor1", "Bangalore-Karnataka-India"),
        )
        .await
        .unwrap();
        assert!(!response.allowed);
    }

    #[tokio::test]
    async fn test_unknown_distributor_is_not_found() {
        let (status, _) = check_handler(State(state(false)), query("nobody", "India"))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_strict_unknown_location_is_rejected() {
        let (status, body) = check_handler(State(state(true)), query("distributor1", "Atlantis"))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.starts_with("UNKNOWN_NAME"));

        let Json(response) = check_handler(State(state(false)), query("distributor1", "Atlantis"))
            .await
            .unwrap();
        assert!(!response.allowed);
    }

    #[tokio::test]
    async fn test_check_inline_rule() {
        let request = CheckRuleRequest {
            rule: PermissionRule::new(["India"], ["TamilNadu-India"]),
            location: "Tirupati-AndhraPradesh-India".to_string(),
        };
        let Json(response) = check_rule_handler(State(state(false)), Json(request))
            .await
            .unwrap();
        assert!(response.allowed);
        assert_eq!(response.distributor, None);
    }

    #[tokio::test]
    async fn test_resolve_lists_granted_cities() {
        let rule = PermissionRule::new(["India"], ["Karnataka-India", "Chennai-TamilNadu-India"]);
        let Json(response) = resolve_handler(State(state(false)), Json(rule))
            .await
            .unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(response.granted[0].city, "TIR");
    }

    #[tokio::test]
    async fn test_health_reports_counts() {
        let Json(response) = health_handler(State(state(false))).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.countries, 2);
        assert_eq!(response.cities, 4);
        assert_eq!(response.distributors, 1);
    }
}
