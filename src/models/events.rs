//! Eventos de telemetría
//!
//! Posiciones de vehículos y ciclo de vida de jobs. Se emiten en modo
//! fire-and-forget hacia un `EventSink`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::{Job, JobType};
use crate::models::vehicle::VehicleStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobEventType {
    Created,
    Assigned,
    Completed,
}

impl JobEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobEventType::Created => "created",
            JobEventType::Assigned => "assigned",
            JobEventType::Completed => "completed",
        }
    }
}

/// Posición y estado de un vehículo en un tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleTelemetry {
    pub event_id: Uuid,
    pub vehicle_id: String,
    pub region: String,
    pub lat: f64,
    pub lng: f64,
    pub status: VehicleStatus,
    pub battery_level: f64,
    pub timestamp: DateTime<Utc>,
}

impl VehicleTelemetry {
    pub fn new(
        vehicle_id: &str,
        region: &str,
        lat: f64,
        lng: f64,
        status: VehicleStatus,
        battery_level: f64,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            vehicle_id: vehicle_id.to_string(),
            region: region.to_string(),
            lat,
            lng,
            status,
            battery_level,
            timestamp: Utc::now(),
        }
    }
}

/// Cambio de estado de un job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobEvent {
    pub event_id: Uuid,
    pub job_id: String,
    pub event_type: JobEventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    pub job_type: JobType,
    pub customer_id: String,
    pub region: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
}

impl JobEvent {
    pub fn from_job(job: &Job, event_type: JobEventType) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            job_id: job.id.clone(),
            event_type,
            timestamp: Utc::now(),
            vehicle_id: job.assigned_vehicle_id.clone(),
            job_type: job.job_type,
            customer_id: job.customer_id.clone(),
            region: job.region.clone(),
            pickup_lat: job.pickup_lat,
            pickup_lng: job.pickup_lng,
            destination_lat: job.destination_lat,
            destination_lng: job.destination_lng,
        }
    }
}

/// Evento publicado al sink
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FleetEvent {
    VehicleTelemetry(VehicleTelemetry),
    Job(JobEvent),
}

impl FleetEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            FleetEvent::VehicleTelemetry(_) => "vehicle_telemetry",
            FleetEvent::Job(_) => "job",
        }
    }
}
