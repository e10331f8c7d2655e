//! Modelo de Job
//!
//! Un job es un viaje (`ride`) o una entrega (`delivery`). El ledger de jobs
//! es el dueño del registro; la simulación solo guarda una copia temporal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::geo::GeoPoint;

/// Tipo de job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Ride,
    Delivery,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Ride => "ride",
            JobType::Delivery => "delivery",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado del job: pending → assigned → (in_progress) → completed.
/// `Failed` existe en el esquema pero ninguna regla de negocio lo produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Assigned => "assigned",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// pending o assigned: cuenta para el límite de generación
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Assigned)
    }

    /// Estados desde los que se puede completar
    pub fn can_complete(&self) -> bool {
        matches!(self, JobStatus::Assigned | JobStatus::InProgress)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "assigned" => Ok(JobStatus::Assigned),
            "in_progress" => Ok(JobStatus::InProgress),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status '{}'", other)),
        }
    }
}

/// Información específica de entregas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeliveryDetails {
    pub restaurant_name: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub instructions: String,
}

/// Desglose de tarifa calculado al crear el job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Fare {
    pub base: f64,
    pub distance: f64,
    pub total: f64,
}

/// Job principal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: String,
    pub job_type: JobType,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_vehicle_id: Option<String>,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub estimated_distance_km: f64,
    pub customer_id: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_details: Option<DeliveryDetails>,
    pub fare_amount: f64,
    pub base_fare: f64,
    pub distance_fare: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Datos de entrada para crear un job
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_type: JobType,
    pub customer_id: String,
    pub region: String,
    pub pickup: GeoPoint,
    pub destination: GeoPoint,
    pub delivery_details: Option<DeliveryDetails>,
}

impl Job {
    /// Construye un job `pending` con la tarifa ya calculada
    pub fn pending(id: String, request: NewJob, estimated_distance_km: f64, fare: Fare) -> Self {
        Self {
            id,
            job_type: request.job_type,
            status: JobStatus::Pending,
            assigned_vehicle_id: None,
            pickup_lat: request.pickup.lat,
            pickup_lng: request.pickup.lng,
            destination_lat: request.destination.lat,
            destination_lng: request.destination.lng,
            estimated_distance_km,
            customer_id: request.customer_id,
            region: request.region,
            delivery_details: request.delivery_details,
            fare_amount: fare.total,
            base_fare: fare.base,
            distance_fare: fare.distance,
            created_at: Utc::now(),
            assigned_at: None,
            completed_at: None,
        }
    }

    pub fn pickup(&self) -> GeoPoint {
        GeoPoint::new(self.pickup_lat, self.pickup_lng)
    }

    pub fn destination(&self) -> GeoPoint {
        GeoPoint::new(self.destination_lat, self.destination_lng)
    }
}
