//! Data Transfer Objects for the HTTP API.
//!
//! Statistic and preference payloads are re-exported from the api module since
//! they already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use crate::api::{StatisticResponse, UserPreference};
use crate::models::GenericQuery;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Registered statistic keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticListResponse {
    pub statistics: Vec<String>,
    pub total: usize,
}

/// Query string of `GET /v1/statistics/{key}`.
///
/// `criteria` and `sort` carry JSON objects encoded as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticQueryParams {
    pub module: Option<String>,
    pub id: Option<String>,
    pub criteria: Option<String>,
    pub sort: Option<String>,
}

impl StatisticQueryParams {
    /// Build the generic query, rejecting `criteria`/`sort` that are not JSON
    /// objects.
    pub fn into_generic_query(self) -> Result<GenericQuery, String> {
        let mut query = GenericQuery::new();
        if let Some(module) = self.module {
            query = query.with("module", module);
        }
        if let Some(id) = self.id {
            query = query.with("id", id);
        }
        if let Some(criteria) = self.criteria {
            query = query.with("criteria", parse_object("criteria", &criteria)?);
        }
        if let Some(sort) = self.sort {
            query = query.with("sort", parse_object("sort", &sort)?);
        }
        Ok(query)
    }
}

fn parse_object(name: &str, raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(format!("'{}' must be a JSON object", name)),
        Err(e) => Err(format!("Invalid '{}' JSON: {}", name, e)),
    }
}
