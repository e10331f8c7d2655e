use std::sync::Arc;

use validator::Validate;

use crate::dto::job_dto::{ActiveJobCountResponse, CreateJobRequest, ProcessPendingResponse};
use crate::models::analytics::RevenueReport;
use crate::models::job::{Job, JobStatus};
use crate::services::job_service::JobService;
use crate::utils::errors::{bad_request_error, AppError};

pub struct JobController {
    jobs: Arc<JobService>,
}

impl JobController {
    pub fn new(jobs: Arc<JobService>) -> Self {
        Self { jobs }
    }

    pub async fn create(&self, request: CreateJobRequest) -> Result<Job, AppError> {
        request.validate()?;
        self.jobs.create_job(request.into()).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Job, AppError> {
        self.jobs.get_job(id).await
    }

    pub async fn list(&self) -> Result<Vec<Job>, AppError> {
        self.jobs.list_jobs().await
    }

    pub async fn complete(&self, id: &str) -> Result<Job, AppError> {
        self.jobs.complete_job(id).await
    }

    pub async fn list_by_status(&self, status: &str) -> Result<Vec<Job>, AppError> {
        let status: JobStatus = status.parse().map_err(|e: String| bad_request_error(&e))?;
        self.jobs.jobs_by_status(status).await
    }

    pub async fn list_by_vehicle(&self, vehicle_id: &str) -> Result<Vec<Job>, AppError> {
        self.jobs.jobs_for_vehicle(vehicle_id).await
    }

    pub async fn process_pending(&self) -> Result<ProcessPendingResponse, AppError> {
        let (pending, assigned) = self.jobs.process_pending_jobs().await?;
        Ok(ProcessPendingResponse { pending, assigned })
    }

    pub async fn active_count(&self) -> Result<ActiveJobCountResponse, AppError> {
        Ok(ActiveJobCountResponse {
            active_jobs: self.jobs.active_job_count().await?,
        })
    }

    pub async fn revenue(&self) -> Result<RevenueReport, AppError> {
        self.jobs.revenue().await
    }
}
