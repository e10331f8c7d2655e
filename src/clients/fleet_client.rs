//! Cliente del servicio de flota

use std::time::Duration;

use async_trait::async_trait;

use crate::dto::{AssignJobRequest, RegisterVehicleRequest, UpdateLocationRequest};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::services::fleet_service::FleetService;
use crate::utils::errors::AppResult;

use super::{build_http_client, ensure_success};

#[async_trait]
pub trait FleetClient: Send + Sync {
    /// Registrar un vehículo (un registro duplicado falla con `AlreadyExists`)
    async fn register_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;

    async fn report_location(
        &self,
        vehicle_id: &str,
        lat: f64,
        lng: f64,
        status: VehicleStatus,
        battery_level: Option<f64>,
    ) -> AppResult<()>;

    async fn assign_job(&self, vehicle_id: &str, job_id: &str) -> AppResult<()>;

    /// Compare-and-set: `InvalidState` si el vehículo ya no está disponible
    async fn reserve_vehicle(&self, vehicle_id: &str, job_id: &str) -> AppResult<()>;

    async fn complete_job(&self, vehicle_id: &str) -> AppResult<()>;

    async fn find_nearest_vehicle(
        &self,
        region: &str,
        pickup_lat: f64,
        pickup_lng: f64,
        trip_distance_km: f64,
    ) -> AppResult<Vehicle>;
}

/// Llama directamente al servicio de flota del mismo proceso
#[derive(Clone)]
pub struct LocalFleetClient {
    fleet: FleetService,
}

impl LocalFleetClient {
    pub fn new(fleet: FleetService) -> Self {
        Self { fleet }
    }
}

#[async_trait]
impl FleetClient for LocalFleetClient {
    async fn register_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.fleet.register_vehicle(vehicle.clone()).await
    }

    async fn report_location(
        &self,
        vehicle_id: &str,
        lat: f64,
        lng: f64,
        status: VehicleStatus,
        battery_level: Option<f64>,
    ) -> AppResult<()> {
        self.fleet
            .report_vehicle(vehicle_id, lat, lng, Some(status), battery_level)
            .await
            .map(|_| ())
    }

    async fn assign_job(&self, vehicle_id: &str, job_id: &str) -> AppResult<()> {
        self.fleet.assign_job(vehicle_id, job_id).await.map(|_| ())
    }

    async fn reserve_vehicle(&self, vehicle_id: &str, job_id: &str) -> AppResult<()> {
        self.fleet.reserve_vehicle(vehicle_id, job_id).await.map(|_| ())
    }

    async fn complete_job(&self, vehicle_id: &str) -> AppResult<()> {
        self.fleet.complete_job(vehicle_id).await.map(|_| ())
    }

    async fn find_nearest_vehicle(
        &self,
        region: &str,
        pickup_lat: f64,
        pickup_lng: f64,
        trip_distance_km: f64,
    ) -> AppResult<Vehicle> {
        self.fleet
            .find_nearest_available_vehicle(region, pickup_lat, pickup_lng, trip_distance_km)
            .await
    }
}

/// Cliente HTTP contra la API de flota
#[derive(Clone)]
pub struct HttpFleetClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFleetClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl FleetClient for HttpFleetClient {
    async fn register_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let response = self
            .client
            .post(self.url("/vehicles"))
            .json(&RegisterVehicleRequest::from_vehicle(vehicle))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json::<Vehicle>().await?)
    }

    async fn report_location(
        &self,
        vehicle_id: &str,
        lat: f64,
        lng: f64,
        status: VehicleStatus,
        battery_level: Option<f64>,
    ) -> AppResult<()> {
        let body = UpdateLocationRequest {
            lat,
            lng,
            status: Some(status),
            battery_level,
        };
        let response = self
            .client
            .put(self.url(&format!("/vehicles/{}/location", vehicle_id)))
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn assign_job(&self, vehicle_id: &str, job_id: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.url(&format!("/vehicles/{}/assign", vehicle_id)))
            .json(&AssignJobRequest {
                job_id: job_id.to_string(),
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn reserve_vehicle(&self, vehicle_id: &str, job_id: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.url(&format!("/vehicles/{}/reserve", vehicle_id)))
            .json(&AssignJobRequest {
                job_id: job_id.to_string(),
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn complete_job(&self, vehicle_id: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.url(&format!("/vehicles/{}/complete", vehicle_id)))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn find_nearest_vehicle(
        &self,
        region: &str,
        pickup_lat: f64,
        pickup_lng: f64,
        trip_distance_km: f64,
    ) -> AppResult<Vehicle> {
        let response = self
            .client
            .get(self.url("/vehicles/find"))
            .query(&[
                ("region", region.to_string()),
                ("pickup_lat", pickup_lat.to_string()),
                ("pickup_lng", pickup_lng.to_string()),
                ("trip_distance_km", trip_distance_km.to_string()),
            ])
            .send()
            .await?;
        Ok(ensure_success(response).await?.json::<Vehicle>().await?)
    }
}
