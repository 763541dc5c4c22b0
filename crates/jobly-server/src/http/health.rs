use crate::app::AppState;
use crate::error::ApiError;
use axum::Json;
use axum::extract::State;
use jobly_db::GenericClient;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health: 200 when the database answers `SELECT 1`, 503 otherwise.
pub async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let client = state.db().await?;
    client
        .query_one_tagged("health", "SELECT 1", &[])
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
