//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use super::dto::{HealthResponse, StatisticListResponse, StatisticQueryParams};
use super::error::AppError;
use super::state::AppState;
use crate::api::{StatisticResponse, UserPreference};
use crate::db;
use crate::models::GenericQuery;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the record store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Statistics
// =============================================================================

/// GET /v1/statistics
///
/// List the registered statistic keys.
pub async fn list_statistics(State(state): State<AppState>) -> HandlerResult<StatisticListResponse> {
    let statistics = state.registry.keys();
    let total = statistics.len();
    Ok(Json(StatisticListResponse { statistics, total }))
}

/// GET /v1/statistics/{key}?module=&id=&criteria=&sort=
pub async fn get_statistic(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<StatisticQueryParams>,
) -> HandlerResult<StatisticResponse> {
    let query = params.into_generic_query().map_err(AppError::BadRequest)?;
    run_statistic(&state, &key, &query).await
}

/// POST /v1/statistics/{key}
///
/// Body is the generic query object (`module`, `id`, `criteria`, `sort`).
pub async fn query_statistic(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult<StatisticResponse> {
    let query = GenericQuery::try_from(body)
        .map_err(|_| AppError::BadRequest("Query body must be a JSON object".to_string()))?;
    run_statistic(&state, &key, &query).await
}

async fn run_statistic(
    state: &AppState,
    key: &str,
    query: &GenericQuery,
) -> HandlerResult<StatisticResponse> {
    let response = state
        .registry
        .get_data(key, query, state.runtime.as_ref())
        .await?;
    Ok(Json(response))
}

// =============================================================================
// User Preferences
// =============================================================================

/// GET /v1/user-preferences/{key}
pub async fn get_user_preference(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> HandlerResult<UserPreference> {
    state
        .preferences
        .get_user_preference(&key, state.runtime.as_ref())?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User preference not found: {}", key)))
}
