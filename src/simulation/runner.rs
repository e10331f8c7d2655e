//! Arranque de la flota simulada
//!
//! Una tarea por vehículo: espera escalonada, registro con reintentos y bucle
//! de ticks hasta la señal de apagado. Los ticks de un vehículo nunca se
//! solapan.

use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::simulation::registration::register_with_retry;
use crate::simulation::spawn::random_spawn_location;
use crate::simulation::vehicle::{SimulatedVehicle, SimulationContext};
use crate::utils::geo::GeoPoint;

pub struct FleetSimulator {
    context: SimulationContext,
    region: String,
    vehicle_count: usize,
    start: GeoPoint,
}

impl FleetSimulator {
    pub fn new(context: SimulationContext, region: impl Into<String>, vehicle_count: usize, start: GeoPoint) -> Self {
        Self {
            context,
            region: region.into(),
            vehicle_count,
            start,
        }
    }

    pub fn vehicle_id(index: usize) -> String {
        format!("sim-vehicle-{}", index)
    }

    /// Lanza todas las tareas de vehículos
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, shutdown: watch::Receiver<bool>) {
        tracing::info!(
            region = %self.region,
            vehicles = self.vehicle_count,
            tick_ms = self.context.config.tick_interval.as_millis() as u64,
            "🚀 Simulador de flota iniciado"
        );

        let stagger = self.context.config.start_stagger;
        let tasks = (1..=self.vehicle_count).map(|index| {
            let (spot, location) = random_spawn_location(&self.region, self.start);
            let battery = self.context.config.random_initial_battery();
            let vehicle = SimulatedVehicle::new(
                Self::vehicle_id(index),
                self.region.clone(),
                location,
                battery,
                self.context.clone(),
            );
            tracing::debug!(vehicle_id = %vehicle.id(), spawn = %spot, battery, "🗺️ Vehículo creado");
            let delay = stagger * (index as u32 - 1);
            tokio::spawn(run_vehicle(vehicle, delay, shutdown.clone()))
        });

        for result in join_all(tasks).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "❌ Tarea de vehículo terminada con error");
            }
        }

        tracing::info!("🛑 Simulador de flota detenido");
    }
}

async fn run_vehicle(mut vehicle: SimulatedVehicle, start_delay: Duration, mut shutdown: watch::Receiver<bool>) {
    if !start_delay.is_zero() {
        tokio::select! {
            _ = tokio::time::sleep(start_delay) => {}
            _ = shutdown.changed() => return,
        }
    }

    let context = vehicle.context().clone();
    let registration = vehicle.to_vehicle();
    let registered = tokio::select! {
        result = register_with_retry(context.fleet.as_ref(), &registration, &context.config.registration) => result,
        _ = shutdown.changed() => return,
    };
    if let Err(e) = registered {
        tracing::error!(vehicle_id = %vehicle.id(), error = %e, "❌ El vehículo no pudo registrarse, abandonando");
        return;
    }

    let mut ticker = interval(context.config.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => vehicle.tick().await,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!(vehicle_id = %vehicle.id(), "🛑 Vehículo detenido");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::clients::{LocalFleetClient, LocalJobClient};
    use crate::config::{PricingConfig, SimulationConfig};
    use crate::models::vehicle::VehicleStatus;
    use crate::repositories::{InMemoryJobRepository, InMemoryVehicleRepository};
    use crate::services::fleet_service::FleetService;
    use crate::services::job_service::JobService;
    use crate::services::routing_service::RoutingService;
    use crate::services::telemetry_service::NoopEventSink;

    #[tokio::test(start_paused = true)]
    async fn test_vehicles_register_and_stop_on_shutdown() {
        let fleet = FleetService::new(Arc::new(InMemoryVehicleRepository::new()));
        let fleet_client = Arc::new(LocalFleetClient::new(fleet.clone()));
        let jobs = Arc::new(JobService::new(
            Arc::new(InMemoryJobRepository::new()),
            fleet_client.clone(),
            Arc::new(NoopEventSink),
            PricingConfig::default(),
        ));
        let context = SimulationContext {
            fleet: fleet_client,
            jobs: Arc::new(LocalJobClient::new(jobs)),
            routing: RoutingService::straight_line(),
            events: Arc::new(NoopEventSink),
            config: SimulationConfig::default(),
        };

        let (tx, rx) = watch::channel(false);
        let handle = FleetSimulator::new(context, "us-west-2", 3, GeoPoint::new(45.5188, -122.6793)).spawn(rx);

        tokio::time::sleep(Duration::from_secs(5)).await;
        let vehicles = fleet.list_vehicles().await.unwrap();
        assert_eq!(vehicles.len(), 3);
        assert!(vehicles.iter().any(|v| v.id == "sim-vehicle-3"));
        assert!(vehicles.iter().all(|v| v.status != VehicleStatus::Maintenance));

        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
