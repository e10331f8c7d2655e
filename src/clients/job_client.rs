//! Cliente del servicio de jobs (usado por la simulación)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::job::Job;
use crate::services::job_service::JobService;
use crate::utils::errors::AppResult;

use super::{build_http_client, ensure_success};

#[async_trait]
pub trait JobClient: Send + Sync {
    /// Jobs cuyo `assigned_vehicle_id` es este vehículo (cualquier estado)
    async fn assigned_jobs(&self, vehicle_id: &str) -> AppResult<Vec<Job>>;

    async fn complete_job(&self, job_id: &str) -> AppResult<Job>;
}

#[derive(Clone)]
pub struct LocalJobClient {
    jobs: Arc<JobService>,
}

impl LocalJobClient {
    pub fn new(jobs: Arc<JobService>) -> Self {
        Self { jobs }
    }
}

#[async_trait]
impl JobClient for LocalJobClient {
    async fn assigned_jobs(&self, vehicle_id: &str) -> AppResult<Vec<Job>> {
        self.jobs.jobs_for_vehicle(vehicle_id).await
    }

    async fn complete_job(&self, job_id: &str) -> AppResult<Job> {
        self.jobs.complete_job(job_id).await
    }
}

#[derive(Clone)]
pub struct HttpJobClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJobClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl JobClient for HttpJobClient {
    async fn assigned_jobs(&self, vehicle_id: &str) -> AppResult<Vec<Job>> {
        let response = self
            .client
            .get(format!("{}/jobs/vehicle/{}", self.base_url, vehicle_id))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json::<Vec<Job>>().await?)
    }

    async fn complete_job(&self, job_id: &str) -> AppResult<Job> {
        let response = self
            .client
            .post(format!("{}/jobs/{}/complete", self.base_url, job_id))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json::<Job>().await?)
    }
}
