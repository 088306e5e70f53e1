//! Health check endpoint

use crate::server::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskly_core::DatabaseStats;
use tracing::warn;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DatabaseStats>,
}

/// Report server liveness and database reachability
///
/// Healthy responses include record counts; an unreachable database
/// reports 503.
pub async fn health_check(State(state): State<AppState>) -> Response {
    if !state.database.is_connected().await {
        warn!("Health check failed: database not connected");
        let body = HealthResponse {
            status: "unhealthy".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            stats: None,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    }

    let stats = match state.database.get_stats().await {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!("Health check could not gather stats: {e}");
            None
        }
    };

    let body = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        stats,
    };
    (StatusCode::OK, Json(body)).into_response()
}
