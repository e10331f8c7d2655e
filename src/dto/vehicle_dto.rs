use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::vehicle::{Vehicle, VehicleStatus, DEFAULT_DRAIN_RATE_KM_PER_PERCENT, DEFAULT_VEHICLE_TYPE};
use crate::utils::validation::{validate_battery_level, validate_coordinates, validate_not_empty, validate_region};

// Request de registro de un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_register_location"))]
pub struct RegisterVehicleRequest {
    #[validate(custom = "validate_not_empty")]
    pub id: String,
    #[validate(custom = "validate_region")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub battery_level: f64,
    pub location_lat: f64,
    pub location_lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drain_rate_km_per_percent: Option<f64>,
}

impl RegisterVehicleRequest {
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.clone(),
            region: vehicle.region.clone(),
            status: Some(vehicle.status),
            battery_level: vehicle.battery_level,
            location_lat: vehicle.location_lat,
            location_lng: vehicle.location_lng,
            vehicle_type: Some(vehicle.vehicle_type.clone()),
            drain_rate_km_per_percent: Some(vehicle.drain_rate_km_per_percent),
        }
    }

    pub fn into_vehicle(self) -> Vehicle {
        let mut vehicle = Vehicle::new(
            self.id,
            self.region,
            self.battery_level,
            crate::utils::geo::GeoPoint::new(self.location_lat, self.location_lng),
        )
        .with_drain_rate(self.drain_rate_km_per_percent.unwrap_or(DEFAULT_DRAIN_RATE_KM_PER_PERCENT));
        vehicle.status = self.status.unwrap_or(VehicleStatus::Available);
        vehicle.vehicle_type = self.vehicle_type.unwrap_or_else(|| DEFAULT_VEHICLE_TYPE.to_string());
        vehicle
    }
}

// Reporte periódico de posición/estado
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_location"))]
pub struct UpdateLocationRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
}

// Request para asignar/reservar un job a un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignJobRequest {
    #[validate(custom = "validate_not_empty")]
    pub job_id: String,
}

// Query de búsqueda del vehículo más cercano
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_find_pickup"))]
pub struct FindVehicleQuery {
    #[validate(custom = "validate_region")]
    pub region: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    #[validate(range(min = 0.0))]
    pub trip_distance_km: f64,
}

fn validate_register_location(request: &RegisterVehicleRequest) -> Result<(), ValidationError> {
    validate_coordinates(request.location_lat, request.location_lng)?;
    match request.drain_rate_km_per_percent {
        Some(rate) if !(rate > 0.0) => Err(ValidationError::new("drain_rate")),
        _ => Ok(()),
    }
}

fn validate_update_location(request: &UpdateLocationRequest) -> Result<(), ValidationError> {
    validate_coordinates(request.lat, request.lng)?;
    match request.battery_level {
        Some(level) => validate_battery_level(level),
        None => Ok(()),
    }
}

fn validate_find_pickup(query: &FindVehicleQuery) -> Result<(), ValidationError> {
    validate_coordinates(query.pickup_lat, query.pickup_lng)
}

// Respuesta genérica de operaciones sin cuerpo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let mut request = RegisterVehicleRequest {
            id: "sim-vehicle-1".to_string(),
            region: "us-west-2".to_string(),
            status: None,
            battery_level: 75.0,
            location_lat: 45.5188,
            location_lng: -122.6793,
            vehicle_type: None,
            drain_rate_km_per_percent: None,
        };
        assert!(request.validate().is_ok());

        request.battery_level = 120.0;
        assert!(request.validate().is_err());

        request.battery_level = 75.0;
        request.id = " ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_into_vehicle_derives_range() {
        let request = RegisterVehicleRequest {
            id: "v1".to_string(),
            region: "us-west-2".to_string(),
            status: None,
            battery_level: 75.0,
            location_lat: 45.5,
            location_lng: -122.6,
            vehicle_type: None,
            drain_rate_km_per_percent: None,
        };
        let vehicle = request.into_vehicle();
        assert_eq!(vehicle.status, VehicleStatus::Available);
        assert_eq!(vehicle.battery_range_km, 300.0);
        assert_eq!(vehicle.vehicle_type, "sedan");
    }
}
