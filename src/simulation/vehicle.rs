//! Máquina de estados de un vehículo simulado
//!
//! Cada tick, en orden: registrar estado, buscar jobs asignados (solo si está
//! libre y sin job), ejecutar el handler del estado, reportar posición y
//! estado a la flota y, si quedó libre con batería baja, ir a cargar.
//!
//! Estados (fase): `available` (idle), `busy` (pickup | delivery),
//! `charging` (going_to_charge | charging), `maintenance` (stranded).

use std::f64::consts::PI;
use std::sync::Arc;

use rand::Rng;

use crate::clients::{FleetClient, JobClient};
use crate::config::SimulationConfig;
use crate::models::events::{FleetEvent, VehicleTelemetry};
use crate::models::job::{Job, JobStatus};
use crate::models::route::Route;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::services::routing_service::RoutingService;
use crate::services::telemetry_service::EventSink;
use crate::simulation::charging::find_nearest_charging_station;
use crate::utils::geo::GeoPoint;

/// Sub-estado dentro de un `VehicleStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehiclePhase {
    Idle,
    Pickup,
    Delivery,
    GoingToCharge,
    Charging,
    Stranded,
}

impl VehiclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehiclePhase::Idle => "idle",
            VehiclePhase::Pickup => "pickup",
            VehiclePhase::Delivery => "delivery",
            VehiclePhase::GoingToCharge => "going_to_charge",
            VehiclePhase::Charging => "charging",
            VehiclePhase::Stranded => "stranded",
        }
    }
}

impl std::fmt::Display for VehiclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dependencias compartidas por todos los vehículos simulados
#[derive(Clone)]
pub struct SimulationContext {
    pub fleet: Arc<dyn FleetClient>,
    pub jobs: Arc<dyn JobClient>,
    pub routing: RoutingService,
    pub events: Arc<dyn EventSink>,
    pub config: SimulationConfig,
}

pub struct SimulatedVehicle {
    id: String,
    region: String,
    status: VehicleStatus,
    phase: VehiclePhase,
    battery: f64,
    drain_rate: f64,
    location: GeoPoint,
    target: GeoPoint,
    route: Option<Route>,
    route_index: usize,
    is_moving: bool,
    current_job: Option<Job>,
    // la flota aún nos tiene `busy` con un job ya terminado
    release_pending: bool,
    context: SimulationContext,
}

impl SimulatedVehicle {
    pub fn new(
        id: impl Into<String>,
        region: impl Into<String>,
        location: GeoPoint,
        battery: f64,
        context: SimulationContext,
    ) -> Self {
        let drain_rate = context.config.drain_rate_km_per_percent;
        Self {
            id: id.into(),
            region: region.into(),
            status: VehicleStatus::Available,
            phase: VehiclePhase::Idle,
            battery: battery.clamp(0.0, 100.0),
            drain_rate,
            location,
            target: location,
            route: None,
            route_index: 0,
            is_moving: false,
            current_job: None,
            release_pending: false,
            context,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    pub fn phase(&self) -> VehiclePhase {
        self.phase
    }

    pub fn battery(&self) -> f64 {
        self.battery
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn current_job(&self) -> Option<&Job> {
        self.current_job.as_ref()
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// Registro que se envía a la flota al arrancar
    pub fn to_vehicle(&self) -> Vehicle {
        let mut vehicle = Vehicle::new(&self.id, &self.region, self.battery, self.location)
            .with_drain_rate(self.drain_rate);
        vehicle.status = self.status;
        vehicle
    }

    /// Avanza un tick de simulación
    pub async fn tick(&mut self) {
        tracing::debug!(
            vehicle_id = %self.id,
            status = %self.status,
            phase = %self.phase,
            battery = self.battery,
            location = %self.location,
            moving = self.is_moving,
            "🚕 Tick"
        );

        if self.status == VehicleStatus::Available && self.current_job.is_none() {
            self.poll_for_jobs().await;
        }

        match self.status {
            VehicleStatus::Available => self.handle_available(),
            VehicleStatus::Busy => self.handle_busy().await,
            VehicleStatus::Charging => self.handle_charging().await,
            VehicleStatus::Maintenance => self.handle_maintenance().await,
        }

        if self.release_pending {
            self.release_from_fleet().await;
        }
        self.report().await;

        if self.status == VehicleStatus::Available
            && self.battery <= self.context.config.low_battery_threshold
        {
            tracing::info!(vehicle_id = %self.id, battery = self.battery, "🔋 Batería baja, yendo a cargar");
            self.go_to_charge().await;
        }
    }

    async fn poll_for_jobs(&mut self) {
        let jobs = match self.context.jobs.assigned_jobs(&self.id).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::warn!(vehicle_id = %self.id, error = %e, "⚠️ No se pudieron consultar los jobs asignados");
                return;
            }
        };

        let Some(job) = jobs.into_iter().find(|j| j.status == JobStatus::Assigned) else {
            return;
        };

        tracing::info!(vehicle_id = %self.id, job_id = %job.id, pickup = %job.pickup(), "📦 Job recibido, yendo a recoger");
        let pickup = job.pickup();
        let job_id = job.id.clone();
        self.current_job = Some(job);
        self.status = VehicleStatus::Busy;
        self.phase = VehiclePhase::Pickup;
        self.set_route_target(pickup).await;

        if let Err(e) = self.context.fleet.assign_job(&self.id, &job_id).await {
            tracing::warn!(vehicle_id = %self.id, job_id = %job_id, error = %e, "⚠️ No se pudo confirmar la asignación en la flota");
        }
    }

    fn handle_available(&mut self) {
        if self.is_moving {
            self.move_towards_target();
            return;
        }

        let config = &self.context.config;
        let mut rng = rand::thread_rng();
        if rng.gen::<f64>() < config.idle_move_probability {
            let angle = rng.gen::<f64>() * 2.0 * PI;
            let radius = rng.gen::<f64>() * config.wander_radius_deg;
            self.target = GeoPoint::new(
                self.location.lat + radius * angle.cos(),
                self.location.lng + radius * angle.sin(),
            );
            self.route = None;
            self.is_moving = true;
        }
    }

    async fn handle_busy(&mut self) {
        let Some(job_id) = self.current_job.as_ref().map(|j| j.id.clone()) else {
            self.status = VehicleStatus::Available;
            self.phase = VehiclePhase::Idle;
            return;
        };

        if self.battery <= self.context.config.critical_battery_threshold {
            tracing::warn!(vehicle_id = %self.id, job_id = %job_id, battery = self.battery, "⚠️ Batería crítica, abandonando job");
            self.abandon_job();
            self.go_to_charge().await;
            return;
        }

        self.move_along_route();
        if self.status != VehicleStatus::Busy {
            return;
        }

        let arrived = !self.is_moving
            || self.location.degree_distance(&self.target) < self.context.config.arrival_threshold_deg;
        if !arrived {
            return;
        }

        match self.phase {
            VehiclePhase::Pickup => {
                let destination = self.current_job.as_ref().map(|j| j.destination());
                if let Some(destination) = destination {
                    tracing::info!(vehicle_id = %self.id, job_id = %job_id, destination = %destination, "🚕 Recogida completada, yendo al destino");
                    self.phase = VehiclePhase::Delivery;
                    self.set_route_target(destination).await;
                }
            }
            VehiclePhase::Delivery => {
                match self.context.jobs.complete_job(&job_id).await {
                    Ok(_) => tracing::info!(vehicle_id = %self.id, job_id = %job_id, "🏁 Job completado"),
                    Err(e) => tracing::error!(vehicle_id = %self.id, job_id = %job_id, error = %e, "❌ No se pudo completar el job"),
                }
                self.stop();
                self.current_job = None;
                self.status = VehicleStatus::Available;
                self.phase = VehiclePhase::Idle;
                self.release_from_fleet().await;
            }
            _ => {}
        }
    }

    async fn handle_charging(&mut self) {
        match self.phase {
            VehiclePhase::GoingToCharge => {
                if self.is_moving {
                    self.move_along_route();
                }
                let arrived = !self.is_moving
                    || self.location.degree_distance(&self.target) < self.context.config.arrival_threshold_deg;
                if self.status == VehicleStatus::Charging && self.phase == VehiclePhase::GoingToCharge && arrived {
                    self.stop();
                    self.phase = VehiclePhase::Charging;
                    tracing::info!(vehicle_id = %self.id, battery = self.battery, "🔌 Llegada a la estación, cargando");
                }
            }
            VehiclePhase::Charging => {
                let config = &self.context.config;
                if self.battery < config.charge_target {
                    self.battery = (self.battery + config.charge_per_tick).min(100.0);
                } else {
                    tracing::info!(vehicle_id = %self.id, battery = self.battery, "✅ Carga completa, disponible");
                    self.status = VehicleStatus::Available;
                    self.phase = VehiclePhase::Idle;
                }
            }
            _ => self.go_to_charge().await,
        }
    }

    async fn handle_maintenance(&mut self) {
        self.battery = self.context.config.roadside_battery_level;
        tracing::info!(vehicle_id = %self.id, battery = self.battery, "🛠️ Asistencia en carretera, yendo a cargar");
        self.go_to_charge().await;
    }

    async fn report(&self) {
        if let Err(e) = self
            .context
            .fleet
            .report_location(&self.id, self.location.lat, self.location.lng, self.status, Some(self.battery))
            .await
        {
            tracing::warn!(vehicle_id = %self.id, error = %e, "⚠️ No se pudo reportar la posición");
        }

        self.context.events.emit(FleetEvent::VehicleTelemetry(VehicleTelemetry::new(
            &self.id,
            &self.region,
            self.location.lat,
            self.location.lng,
            self.status,
            self.battery,
        )));
    }

    /// Un reporte `available` no libera una reserva, así que se pide explícitamente
    async fn release_from_fleet(&mut self) {
        match self.context.fleet.complete_job(&self.id).await {
            Ok(()) => self.release_pending = false,
            Err(e) => {
                tracing::warn!(vehicle_id = %self.id, error = %e, "⚠️ No se pudo liberar el vehículo en la flota, se reintenta");
                self.release_pending = true;
            }
        }
    }

    async fn go_to_charge(&mut self) {
        let station = find_nearest_charging_station(&self.region, self.location);
        tracing::info!(vehicle_id = %self.id, station = %station.id, battery = self.battery, "🔋 Yendo a la estación de carga");
        self.status = VehicleStatus::Charging;
        self.phase = VehiclePhase::GoingToCharge;
        self.set_route_target(station.location()).await;
    }

    async fn set_route_target(&mut self, target: GeoPoint) {
        self.target = target;
        let route = self.context.routing.get_route(self.location, target).await;
        tracing::debug!(
            vehicle_id = %self.id,
            waypoints = route.len(),
            distance_km = route.distance_km(),
            eta_min = route.duration_minutes(),
            "🗺️ Nueva ruta"
        );
        self.route = Some(route);
        self.route_index = 0;
        self.is_moving = true;
    }

    fn stop(&mut self) {
        self.is_moving = false;
        self.route = None;
        self.route_index = 0;
    }

    /// El job se suelta sin notificar al ledger. La flota lo libera con el
    /// siguiente reporte, que ya no es `available` (`charging` o `maintenance`).
    fn abandon_job(&mut self) {
        if let Some(job) = self.current_job.take() {
            tracing::warn!(vehicle_id = %self.id, job_id = %job.id, "⚠️ Job abandonado");
        }
        self.phase = VehiclePhase::Idle;
    }

    fn move_along_route(&mut self) {
        if self.battery <= 0.0 {
            self.handle_depletion();
            return;
        }

        let Some(route) = self.route.as_ref() else {
            self.move_towards_target();
            return;
        };

        let previous = self.location;
        if self.route_index + 1 >= route.points.len() {
            self.location = self.target;
            self.stop();
        } else {
            let next = route.points[self.route_index + 1];
            let step = self.context.config.step_size_deg;
            let distance = self.location.degree_distance(&next);
            if distance < step {
                self.location = next;
                self.route_index += 1;
            } else {
                self.location = self.location.lerp(&next, step / distance);
            }
        }

        self.drain_battery(previous.distance_km(&self.location));
    }

    fn move_towards_target(&mut self) {
        let previous = self.location;
        let distance = self.location.degree_distance(&self.target);
        if distance < self.context.config.arrival_threshold_deg {
            self.location = self.target;
            self.stop();
        } else {
            let ratio = (self.context.config.step_size_deg / distance).min(1.0);
            self.location = self.location.lerp(&self.target, ratio);
        }

        self.drain_battery(previous.distance_km(&self.location));
    }

    /// Descuenta `distance_km / drain_rate` puntos de batería (acotado a 0)
    pub fn drain_battery(&mut self, distance_km: f64) {
        if self.drain_rate > 0.0 {
            self.battery = (self.battery - distance_km / self.drain_rate).max(0.0);
        }
        if self.battery <= 0.0 {
            self.handle_depletion();
        }
    }

    fn handle_depletion(&mut self) {
        self.battery = 0.0;

        if self.status == VehicleStatus::Charging && self.phase == VehiclePhase::GoingToCharge {
            let station = find_nearest_charging_station(&self.region, self.location);
            tracing::warn!(vehicle_id = %self.id, station = %station.id, "🚚 Batería agotada camino a cargar, remolcado a la estación");
            self.location = station.location();
            self.target = self.location;
            self.stop();
            self.phase = VehiclePhase::Charging;
            self.battery = self.context.config.towed_battery_level;
            return;
        }

        tracing::error!(vehicle_id = %self.id, location = %self.location, "❌ Batería agotada, vehículo varado");
        self.stop();
        self.abandon_job();
        self.status = VehicleStatus::Maintenance;
        self.phase = VehiclePhase::Stranded;
    }
}
