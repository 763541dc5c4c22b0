//! `/jobs` handlers.
//!
//! Reads are public; writes require an admin token. Bodies are validated
//! before the database is touched, so an invalid body is always `400`.

use crate::app::AppState;
use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::input::{JobPatchInput, JobsQuery, NewJobInput, parse_body, parse_query};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use jobly_db::Job;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: Job,
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: String,
}

// Non-numeric ids cannot name a job.
fn parse_id(raw: &str) -> ApiResult<i32> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("No job with id: {raw}")))
}

/// POST /jobs
pub async fn create_job(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    let input: NewJobInput = parse_body(body)?;
    input.validate()?;

    let client = state.db().await?;
    let job = Job::create(&client, &input.into_new_job()).await?;
    tracing::info!(id = job.id, by = %admin.username, "job created");
    Ok((StatusCode::CREATED, Json(JobResponse { job })))
}

/// GET /jobs
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    query: Result<Query<JobsQuery>, QueryRejection>,
) -> ApiResult<Json<JobsResponse>> {
    let filter = parse_query(query)?.into_filter()?;

    let client = state.db().await?;
    let jobs = Job::find_all(&client, &filter).await?;
    Ok(Json(JobsResponse { jobs }))
}

/// GET /jobs/{id}
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let id = parse_id(&id)?;

    let client = state.db().await?;
    let job = Job::get(&client, id).await?;
    Ok(Json(JobResponse { job }))
}

/// PATCH /jobs/{id}
pub async fn update_job(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResult<Json<JobResponse>> {
    let input: JobPatchInput = parse_body(body)?;
    input.validate()?;
    let patch = input.into_patch();
    if patch.is_empty() {
        return Err(ApiError::bad_request("No data"));
    }
    let id = parse_id(&id)?;

    let client = state.db().await?;
    let job = Job::update(&client, id, &patch).await?;
    tracing::info!(id, by = %admin.username, "job updated");
    Ok(Json(JobResponse { job }))
}

/// DELETE /jobs/{id}
pub async fn delete_job(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let id = parse_id(&id)?;

    let client = state.db().await?;
    Job::remove(&client, id).await?;
    tracing::info!(id, by = %admin.username, "job deleted");
    Ok(Json(DeletedResponse {
        deleted: id.to_string(),
    }))
}
