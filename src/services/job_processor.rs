//! Barrido periódico de jobs pendientes
//!
//! Tarea en segundo plano que cada `interval` reintenta asignar todos los
//! jobs `pending`. Se detiene cuando la señal de apagado cambia a `true`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::services::job_service::JobService;

pub struct JobProcessor {
    jobs: Arc<JobService>,
    interval: Duration,
}

impl JobProcessor {
    pub fn new(jobs: Arc<JobService>, interval: Duration) -> Self {
        Self { jobs, interval }
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_secs = self.interval.as_secs_f64(), "🚀 Procesador de jobs iniciado");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.jobs.process_pending_jobs().await {
                        tracing::error!(error = %e, "❌ Error procesando jobs pendientes");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("🛑 Procesador de jobs detenido");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::LocalFleetClient;
    use crate::config::PricingConfig;
    use crate::models::job::JobStatus;
    use crate::models::vehicle::Vehicle;
    use crate::repositories::{InMemoryJobRepository, InMemoryVehicleRepository};
    use crate::services::fleet_service::FleetService;
    use crate::services::telemetry_service::NoopEventSink;
    use crate::utils::geo::GeoPoint;

    #[tokio::test(start_paused = true)]
    async fn test_sweep_runs_on_interval_and_stops() {
        let fleet = FleetService::new(Arc::new(InMemoryVehicleRepository::new()));
        let jobs = Arc::new(JobService::new(
            Arc::new(InMemoryJobRepository::new()),
            Arc::new(LocalFleetClient::new(fleet.clone())),
            Arc::new(NoopEventSink),
            PricingConfig::default(),
        ));

        let job = jobs
            .create_ride_job("c1", "us-west-2", 45.5188, -122.6793, 45.5230, -122.6814)
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Pending);

        let (tx, rx) = watch::channel(false);
        let handle = JobProcessor::new(jobs.clone(), Duration::from_secs(5)).spawn(rx);

        fleet
            .register_vehicle(Vehicle::new("v1", "us-west-2", 90.0, GeoPoint::new(45.5188, -122.6793)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(jobs.get_job(&job.id).await.unwrap().status, JobStatus::Assigned);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
