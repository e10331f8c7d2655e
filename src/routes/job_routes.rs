use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::job_controller::JobController;
use crate::dto::job_dto::{ActiveJobCountResponse, CreateJobRequest, ProcessPendingResponse};
use crate::models::analytics::RevenueReport;
use crate::models::job::Job;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_job_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_job))
        .route("/", get(list_jobs))
        .route("/active-count", get(active_job_count))
        .route("/process-pending", post(process_pending))
        .route("/status/:status", get(jobs_by_status))
        .route("/vehicle/:vehicle_id", get(jobs_for_vehicle))
        .route("/:id", get(get_job))
        .route("/:id/complete", post(complete_job))
}

pub fn create_revenue_router() -> Router<AppState> {
    Router::new().route("/", get(revenue))
}

fn controller(state: &AppState) -> Result<JobController, AppError> {
    Ok(JobController::new(state.jobs()?))
}

async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = controller(&state)?.create(request).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(controller(&state)?.list().await?))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(controller(&state)?.get_by_id(&id).await?))
}

async fn complete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(controller(&state)?.complete(&id).await?))
}

async fn jobs_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(controller(&state)?.list_by_status(&status).await?))
}

async fn jobs_for_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(controller(&state)?.list_by_vehicle(&vehicle_id).await?))
}

async fn process_pending(State(state): State<AppState>) -> Result<Json<ProcessPendingResponse>, AppError> {
    Ok(Json(controller(&state)?.process_pending().await?))
}

async fn active_job_count(State(state): State<AppState>) -> Result<Json<ActiveJobCountResponse>, AppError> {
    Ok(Json(controller(&state)?.active_count().await?))
}

async fn revenue(State(state): State<AppState>) -> Result<Json<RevenueReport>, AppError> {
    Ok(Json(controller(&state)?.revenue().await?))
}
