//! HTTP-facing error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jobly_db::DbError;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or invalid request; carries one message per problem.
    #[error("Bad request: {}", .0.join("; "))]
    BadRequest(Vec<String>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    /// The database could not be reached.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(vec![message.into()])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(message) => ApiError::NotFound(message),
            DbError::InvalidInput(message) => ApiError::BadRequest(vec![message]),
            DbError::UniqueViolation(_)
            | DbError::ForeignKeyViolation(_)
            | DbError::CheckViolation(_) => ApiError::BadRequest(vec![err.to_string()]),
            DbError::Connection(message) | DbError::Pool(message) => {
                ApiError::Unavailable(message)
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(messages) => json!(messages),
            ApiError::Unauthorized => json!("Unauthorized"),
            ApiError::NotFound(message) => json!(message),
            ApiError::Unavailable(detail) => {
                tracing::warn!(%detail, "database unavailable");
                json!("Service Unavailable")
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                json!("Internal Server Error")
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "status": status.as_u16(),
            }
        });
        (status, Json(body)).into_response()
    }
}
