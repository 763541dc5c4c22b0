//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs carrying `{ "username": ..., "isAdmin": ... }`.
//! They carry no expiry; `iat` is set when issued but not checked.

use crate::app::AppState;
use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

/// Sign a token for `username`.
pub fn create_token(username: &str, is_admin: bool, secret: &str) -> Result<String, ApiError> {
    let iat = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .ok();
    let claims = Claims {
        username: username.to_string(),
        is_admin,
        iat,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
}

/// Verify the signature of `token` and return its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::InvalidSignature => "invalid signature",
            ErrorKind::InvalidAlgorithm => "unexpected algorithm",
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                "malformed token"
            }
            _ => "token rejected",
        };
        tracing::warn!(reason, "rejected bearer token");
        ApiError::Unauthorized
    })
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Extractor that admits only requests with a valid admin token.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let claims = verify_token(token, &state.config.auth.secret_key)?;
        if !claims.is_admin {
            tracing::warn!(username = %claims.username, "non-admin attempted a write");
            return Err(ApiError::Unauthorized);
        }
        Ok(AdminUser(claims))
    }
}
