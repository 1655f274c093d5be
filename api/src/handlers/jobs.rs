//! Job API Handlers
//!
//! Every handler works on the caller's own jobs only. Admins may read, but
//! not change, another user's job.

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Session,
    error::{AppError, AppResult},
    handlers::{AppJson, AppPath, AppQuery},
    models::job::{CreateJob, JobModifiedResponse, JobResponse, UpdateJob},
    models::MessageResponse,
    repository::job_repository,
    service::query::{JobQuery, JobsResponse, ListJobsParams},
    service::{query_service, stats::JobStats, stats_service},
    AppState,
};

fn no_job(id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("no job with id {}", id))
}

/// An id that is not a UUID names no job.
fn job_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| no_job(raw))
}

/// GET /jobs
pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppQuery(params): AppQuery<ListJobsParams>,
) -> AppResult<Json<JobsResponse>> {
    let query = JobQuery::from_params(session.user_id, &params);
    let page = query_service::list_jobs(&state.db, &query).await?;
    Ok(Json(page.into()))
}

/// POST /jobs
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppJson(req): AppJson<CreateJob>,
) -> AppResult<(StatusCode, Json<JobResponse>)> {
    req.validate()?;

    let job = job_repository::create(&state.db, session.user_id, &req, Utc::now()).await?;
    tracing::info!(job_id = %job.id, owner = %job.created_by, "job created");

    Ok((StatusCode::CREATED, Json(JobResponse { job })))
}

/// GET /jobs/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Json<JobStats>> {
    let stats = stats_service::job_stats(&state.db, session.user_id).await?;
    Ok(Json(stats))
}

/// GET /jobs/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppPath(raw_id): AppPath<String>,
) -> AppResult<Json<JobResponse>> {
    let id = job_id(&raw_id)?;
    let job = job_repository::find_by_id(&state.db, id)
        .await?
        .filter(|job| job.created_by == session.user_id || session.is_admin())
        .ok_or_else(|| no_job(id))?;

    Ok(Json(JobResponse { job }))
}

/// PATCH /jobs/{id}
pub async fn edit(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppPath(raw_id): AppPath<String>,
    AppJson(changes): AppJson<UpdateJob>,
) -> AppResult<Json<JobModifiedResponse>> {
    let id = job_id(&raw_id)?;
    changes.validate()?;

    let job = job_repository::update(&state.db, id, session.user_id, &changes)
        .await?
        .ok_or_else(|| no_job(id))?;
    tracing::info!(job_id = %job.id, "job modified");

    Ok(Json(JobModifiedResponse {
        message: "job modified".to_string(),
        job,
    }))
}

/// DELETE /jobs/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppPath(raw_id): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = job_id(&raw_id)?;
    if !job_repository::delete(&state.db, id, session.user_id).await? {
        return Err(no_job(id));
    }
    tracing::info!(job_id = %id, "job deleted");

    Ok(Json(MessageResponse::new("job deleted")))
}
