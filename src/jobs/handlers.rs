use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{extractors::AuthUser, policy::JOB_MANAGERS},
    error::ApiResult,
    jobs::{
        dto::{DeletedResponse, Empty, JobListResponse, JobRequest, JobResponse},
        services,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(get_job))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", axum::routing::post(create_job))
        .route(
            "/jobs/:id",
            axum::routing::put(update_job).delete(delete_job),
        )
        .route("/jobs/my/jobs", get(list_my_jobs))
}

#[instrument(skip(state))]
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<JobListResponse>> {
    let jobs = services::list_jobs(state.jobs.as_ref()).await?;
    Ok(Json(jobs.into()))
}

#[instrument(skip(state, id))]
pub async fn get_job(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<JobResponse>> {
    let Path(id) = id?;
    let job = services::get_job(state.jobs.as_ref(), id).await?;
    Ok(Json(job.into()))
}

#[instrument(skip_all)]
pub async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    let requester = user.authorize(JOB_MANAGERS)?;
    let Json(payload) = payload?;
    let job = services::create_job(state.jobs.as_ref(), requester, payload).await?;
    Ok((StatusCode::CREATED, Json(job.into())))
}

#[instrument(skip_all)]
pub async fn update_job(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> ApiResult<Json<JobResponse>> {
    let requester = user.authorize(JOB_MANAGERS)?;
    let Path(id) = id?;
    let Json(payload) = payload?;
    let job = services::update_job(state.jobs.as_ref(), requester, id, payload).await?;
    Ok(Json(job.into()))
}

#[instrument(skip_all)]
pub async fn delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<DeletedResponse>> {
    let requester = user.authorize(JOB_MANAGERS)?;
    let Path(id) = id?;
    services::delete_job(state.jobs.as_ref(), requester, id).await?;
    Ok(Json(DeletedResponse {
        success: true,
        data: Empty {},
    }))
}

#[instrument(skip_all)]
pub async fn list_my_jobs(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<JobListResponse>> {
    let requester = user.authorize(JOB_MANAGERS)?;
    let jobs = services::list_my_jobs(state.jobs.as_ref(), requester).await?;
    Ok(Json(jobs.into()))
}
