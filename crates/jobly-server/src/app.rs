use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::http;
use axum::Router;
use axum::routing::get;
use jobly_db::{Pool, PoolClient, TracedClient};
use std::sync::Arc;

/// Shared state handed to every handler.
pub struct AppState {
    pub config: ServerConfig,
    pub pool: Pool,
}

impl AppState {
    pub fn new(config: ServerConfig, pool: Pool) -> Self {
        Self { config, pool }
    }

    /// Check out a pooled connection wrapped for statement logging.
    pub async fn db(&self) -> Result<TracedClient<PoolClient>, ApiError> {
        let client = self.pool.get().await.map_err(jobly_db::DbError::from)?;
        let traced = TracedClient::new(client);
        Ok(match self.config.database.slow_query_threshold() {
            Some(threshold) => traced.slow_query_threshold(threshold),
            None => traced,
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(http::health::health_handler))
        .route(
            "/jobs",
            get(http::jobs::list_jobs).post(http::jobs::create_job),
        )
        .route(
            "/jobs/{id}",
            get(http::jobs::get_job)
                .patch(http::jobs::update_job)
                .delete(http::jobs::delete_job),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
