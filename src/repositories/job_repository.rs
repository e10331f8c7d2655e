//! Ledger de jobs
//!
//! Dueño del registro autoritativo de cada job. `update_status` sella
//! `assigned_at` / `completed_at` en la misma sección crítica que el estado.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::job::{Job, JobStatus};
use crate::utils::errors::{conflict_error, invalid_state_error, not_found_error, AppResult};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: Job) -> AppResult<Job>;

    async fn get(&self, id: &str) -> AppResult<Job>;

    /// Compare-and-set: `pending` → `assigned` con el vehículo; `InvalidState`
    /// si otro asignador llegó antes
    async fn assign_if_pending(&self, id: &str, vehicle_id: &str) -> AppResult<Job>;

    async fn update_status(
        &self,
        id: &str,
        status: JobStatus,
        vehicle_id: Option<String>,
    ) -> AppResult<Job>;

    /// Ordenados por `created_at` y luego por id
    async fn find_by_status(&self, status: JobStatus) -> AppResult<Vec<Job>>;

    async fn find_by_vehicle(&self, vehicle_id: &str) -> AppResult<Vec<Job>>;

    async fn list_all(&self) -> AppResult<Vec<Job>>;
}

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<String, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_by_creation(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: Job) -> AppResult<Job> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(conflict_error("Job", &job.id));
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    async fn get(&self, id: &str) -> AppResult<Job> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found_error("Job", id))
    }

    async fn assign_if_pending(&self, id: &str, vehicle_id: &str) -> AppResult<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(id).ok_or_else(|| not_found_error("Job", id))?;
        if job.status != JobStatus::Pending {
            return Err(invalid_state_error("Job", id, job.status.as_str()));
        }

        job.status = JobStatus::Assigned;
        job.assigned_vehicle_id = Some(vehicle_id.to_string());
        job.assigned_at = Some(Utc::now());
        Ok(job.clone())
    }

    async fn update_status(
        &self,
        id: &str,
        status: JobStatus,
        vehicle_id: Option<String>,
    ) -> AppResult<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(id).ok_or_else(|| not_found_error("Job", id))?;

        job.status = status;
        if vehicle_id.is_some() {
            job.assigned_vehicle_id = vehicle_id;
        }
        match status {
            JobStatus::Assigned => job.assigned_at = Some(Utc::now()),
            JobStatus::Completed => job.completed_at = Some(Utc::now()),
            _ => {}
        }

        Ok(job.clone())
    }

    async fn find_by_status(&self, status: JobStatus) -> AppResult<Vec<Job>> {
        let mut matching: Vec<Job> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|j| j.status == status)
            .cloned()
            .collect();
        sort_by_creation(&mut matching);
        Ok(matching)
    }

    async fn find_by_vehicle(&self, vehicle_id: &str) -> AppResult<Vec<Job>> {
        let mut matching: Vec<Job> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|j| j.assigned_vehicle_id.as_deref() == Some(vehicle_id))
            .cloned()
            .collect();
        sort_by_creation(&mut matching);
        Ok(matching)
    }

    async fn list_all(&self) -> AppResult<Vec<Job>> {
        let mut all: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        sort_by_creation(&mut all);
        Ok(all)
    }
}
