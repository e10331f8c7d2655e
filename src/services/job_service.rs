//! Orquestador de jobs
//!
//! Crea jobs (viajes y entregas), calcula la tarifa, intenta la asignación
//! inmediata al vehículo más cercano y expone las consultas del ledger. Que
//! no haya vehículo nunca es un error para quien crea el job: queda
//! `pending` hasta que el barrido periódico lo asigne.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::clients::FleetClient;
use crate::config::PricingConfig;
use crate::models::analytics::RevenueReport;
use crate::models::events::{FleetEvent, JobEvent, JobEventType};
use crate::models::job::{DeliveryDetails, Job, JobStatus, JobType, NewJob};
use crate::repositories::JobRepository;
use crate::services::pricing_service::compute_fare;
use crate::services::telemetry_service::EventSink;
use crate::utils::errors::{invalid_state_error, AppError, AppResult};
use crate::utils::geo::GeoPoint;

/// Intentos de dispatch cuando otro asignador se queda con el vehículo
pub const MAX_DISPATCH_ATTEMPTS: usize = 3;

pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    fleet: Arc<dyn FleetClient>,
    events: Arc<dyn EventSink>,
    pricing: PricingConfig,
    counter: AtomicU64,
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        fleet: Arc<dyn FleetClient>,
        events: Arc<dyn EventSink>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            jobs,
            fleet,
            events,
            pricing,
            counter: AtomicU64::new(0),
        }
    }

    fn next_job_id(&self, job_type: JobType) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", job_type.as_str(), n)
    }

    pub async fn create_ride_job(
        &self,
        customer_id: &str,
        region: &str,
        pickup_lat: f64,
        pickup_lng: f64,
        dest_lat: f64,
        dest_lng: f64,
    ) -> AppResult<Job> {
        self.create_job(NewJob {
            job_type: JobType::Ride,
            customer_id: customer_id.to_string(),
            region: region.to_string(),
            pickup: GeoPoint::new(pickup_lat, pickup_lng),
            destination: GeoPoint::new(dest_lat, dest_lng),
            delivery_details: None,
        })
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_delivery_job(
        &self,
        customer_id: &str,
        region: &str,
        pickup_lat: f64,
        pickup_lng: f64,
        dest_lat: f64,
        dest_lng: f64,
        delivery_details: DeliveryDetails,
    ) -> AppResult<Job> {
        self.create_job(NewJob {
            job_type: JobType::Delivery,
            customer_id: customer_id.to_string(),
            region: region.to_string(),
            pickup: GeoPoint::new(pickup_lat, pickup_lng),
            destination: GeoPoint::new(dest_lat, dest_lng),
            delivery_details: Some(delivery_details),
        })
        .await
    }

    /// Persistir como `pending` e intentar asignar en el momento
    pub async fn create_job(&self, request: NewJob) -> AppResult<Job> {
        let distance_km = request.pickup.distance_km(&request.destination);
        let fare = compute_fare(&self.pricing, request.job_type, distance_km);
        let id = self.next_job_id(request.job_type);

        let job = self
            .jobs
            .create(Job::pending(id, request, distance_km, fare))
            .await?;
        log::info!(
            "📦 Job {} creado ({}, {:.2} km, ${:.2})",
            job.id,
            job.job_type,
            job.estimated_distance_km,
            job.fare_amount
        );
        self.emit(&job, JobEventType::Created);

        match self.assign_job(&job.id).await {
            Ok(assigned) => Ok(assigned),
            Err(e) => {
                log::warn!("⚠️ Job {} no asignado al crearlo: {}", job.id, e);
                // el barrido puede haberlo asignado en paralelo
                Ok(self.jobs.get(&job.id).await.unwrap_or(job))
            }
        }
    }

    /// Dispatch → reserva del vehículo → job `assigned`.
    ///
    /// Sin locks propios: la reserva es un compare-and-set en la flota y el
    /// paso a `assigned` otro en el ledger, así que asignadores concurrentes
    /// nunca comparten vehículo ni job.
    pub async fn assign_job(&self, job_id: &str) -> AppResult<Job> {
        let job = self.jobs.get(job_id).await?;
        if job.status != JobStatus::Pending {
            return Err(invalid_state_error("Job", &job.id, job.status.as_str()));
        }

        let mut last_error = None;
        for attempt in 1..=MAX_DISPATCH_ATTEMPTS {
            let vehicle = self
                .fleet
                .find_nearest_vehicle(&job.region, job.pickup_lat, job.pickup_lng, job.estimated_distance_km)
                .await?;

            match self.fleet.reserve_vehicle(&vehicle.id, &job.id).await {
                Ok(()) => {
                    return self.commit_assignment(&job.id, &vehicle.id).await;
                }
                Err(AppError::InvalidState(msg)) => {
                    log::warn!(
                        "⚠️ Vehículo {} ya no está disponible para {} (intento {}/{})",
                        vehicle.id,
                        job.id,
                        attempt,
                        MAX_DISPATCH_ATTEMPTS
                    );
                    last_error = Some(AppError::InvalidState(msg));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::NoVehicleAvailable(format!("no vehicle could be reserved for job {}", job.id))
        }))
    }

    async fn commit_assignment(&self, job_id: &str, vehicle_id: &str) -> AppResult<Job> {
        match self.jobs.assign_if_pending(job_id, vehicle_id).await {
            Ok(assigned) => {
                log::info!("✅ Job {} asignado al vehículo {}", job_id, vehicle_id);
                self.emit(&assigned, JobEventType::Assigned);
                Ok(assigned)
            }
            Err(e) => {
                // otro asignador ganó el job: liberar la reserva
                if let Err(release) = self.fleet.complete_job(vehicle_id).await {
                    log::error!("❌ No se pudo liberar el vehículo {}: {}", vehicle_id, release);
                }
                Err(e)
            }
        }
    }

    /// Reintentar la asignación de todos los `pending` en orden de creación.
    /// Devuelve (pendientes revisados, asignados).
    pub async fn process_pending_jobs(&self) -> AppResult<(usize, usize)> {
        let pending = self.jobs.find_by_status(JobStatus::Pending).await?;
        let mut assigned = 0;

        for job in &pending {
            match self.assign_job(&job.id).await {
                Ok(_) => assigned += 1,
                Err(e) => log::debug!("⏳ Job {} sigue pendiente: {}", job.id, e),
            }
        }

        if !pending.is_empty() {
            log::info!("🔄 Barrido de pendientes: {} revisados, {} asignados", pending.len(), assigned);
        }
        Ok((pending.len(), assigned))
    }

    pub async fn complete_job(&self, job_id: &str) -> AppResult<Job> {
        let job = self.jobs.get(job_id).await?;
        if !job.status.can_complete() {
            return Err(invalid_state_error("Job", job_id, job.status.as_str()));
        }

        let completed = self
            .jobs
            .update_status(job_id, JobStatus::Completed, None)
            .await?;
        log::info!("🏁 Job {} completado (${:.2})", job_id, completed.fare_amount);
        self.emit(&completed, JobEventType::Completed);
        Ok(completed)
    }

    pub async fn get_job(&self, job_id: &str) -> AppResult<Job> {
        self.jobs.get(job_id).await
    }

    pub async fn list_jobs(&self) -> AppResult<Vec<Job>> {
        self.jobs.list_all().await
    }

    pub async fn jobs_by_status(&self, status: JobStatus) -> AppResult<Vec<Job>> {
        self.jobs.find_by_status(status).await
    }

    pub async fn jobs_for_vehicle(&self, vehicle_id: &str) -> AppResult<Vec<Job>> {
        self.jobs.find_by_vehicle(vehicle_id).await
    }

    /// Jobs en {pending, assigned}
    pub async fn active_job_count(&self) -> AppResult<usize> {
        let jobs = self.jobs.list_all().await?;
        Ok(jobs.iter().filter(|j| j.status.is_active()).count())
    }

    pub async fn revenue(&self) -> AppResult<RevenueReport> {
        let jobs = self.jobs.list_all().await?;
        Ok(RevenueReport::from_jobs(&jobs))
    }

    fn emit(&self, job: &Job, event_type: JobEventType) {
        self.events
            .emit(FleetEvent::Job(JobEvent::from_job(job, event_type)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::LocalFleetClient;
    use crate::models::vehicle::{Vehicle, VehicleStatus};
    use crate::repositories::{InMemoryJobRepository, InMemoryVehicleRepository};
    use crate::services::fleet_service::FleetService;
    use crate::services::telemetry_service::NoopEventSink;

    fn setup() -> (JobService, FleetService) {
        let fleet = FleetService::new(Arc::new(InMemoryVehicleRepository::new()));
        let service = JobService::new(
            Arc::new(InMemoryJobRepository::new()),
            Arc::new(LocalFleetClient::new(fleet.clone())),
            Arc::new(NoopEventSink),
            PricingConfig::default(),
        );
        (service, fleet)
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_process() {
        let (service, _fleet) = setup();
        let a = service
            .create_ride_job("c1", "us-west-2", 37.7749, -122.4194, 37.7849, -122.4094)
            .await
            .unwrap();
        let b = service
            .create_delivery_job(
                "c2",
                "us-west-2",
                37.7749,
                -122.4194,
                37.7849,
                -122.4094,
                DeliveryDetails::default(),
            )
            .await
            .unwrap();
        assert_eq!(a.id, "ride-1");
        assert_eq!(b.id, "delivery-2");
    }

    #[tokio::test]
    async fn test_assign_requires_pending() {
        let (service, fleet) = setup();
        fleet
            .register_vehicle(Vehicle::new("v1", "us-west-2", 90.0, GeoPoint::new(37.7749, -122.4194)))
            .await
            .unwrap();
        let job = service
            .create_ride_job("c1", "us-west-2", 37.7749, -122.4194, 37.7849, -122.4094)
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Assigned);

        let err = service.assign_job(&job.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_busy_vehicle_is_skipped_for_next_job() {
        let (service, fleet) = setup();
        fleet
            .register_vehicle(Vehicle::new("v1", "us-west-2", 90.0, GeoPoint::new(37.7749, -122.4194)))
            .await
            .unwrap();
        fleet
            .register_vehicle(Vehicle::new("v2", "us-west-2", 90.0, GeoPoint::new(37.7, -122.3)))
            .await
            .unwrap();

        let first = service
            .create_ride_job("c1", "us-west-2", 37.7749, -122.4194, 37.7849, -122.4094)
            .await
            .unwrap();
        let second = service
            .create_ride_job("c2", "us-west-2", 37.7749, -122.4194, 37.7849, -122.4094)
            .await
            .unwrap();

        assert_eq!(first.assigned_vehicle_id.as_deref(), Some("v1"));
        assert_eq!(second.assigned_vehicle_id.as_deref(), Some("v2"));
        let v2 = fleet.get_vehicle("v2").await.unwrap();
        assert_eq!(v2.status, VehicleStatus::Busy);
        assert_eq!(v2.current_job_id.as_deref(), Some(second.id.as_str()));
    }

    #[tokio::test]
    async fn test_sweep_assigns_pending_once_vehicle_appears() {
        let (service, fleet) = setup();
        let job = service
            .create_ride_job("c1", "us-west-2", 37.7749, -122.4194, 37.7849, -122.4094)
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Pending);

        assert_eq!(service.process_pending_jobs().await.unwrap(), (1, 0));

        fleet
            .register_vehicle(Vehicle::new("v1", "us-west-2", 90.0, GeoPoint::new(37.7749, -122.4194)))
            .await
            .unwrap();
        assert_eq!(service.process_pending_jobs().await.unwrap(), (1, 1));

        let stored = service.get_job(&job.id).await.unwrap();
        assert_eq!(stored.status, JobStatus::Assigned);
        assert!(stored.assigned_at.is_some());
    }
}
