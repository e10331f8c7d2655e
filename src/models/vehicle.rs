//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle tal como lo guarda el directorio
//! de flota. La autonomía (`battery_range_km`) siempre se deriva del nivel
//! de batería y de la tasa de consumo del vehículo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::geo::GeoPoint;

/// Kilómetros recorridos por cada punto porcentual de batería (400 km de autonomía total)
pub const DEFAULT_DRAIN_RATE_KM_PER_PERCENT: f64 = 4.0;

/// Tipo de vehículo por defecto al registrarse
pub const DEFAULT_VEHICLE_TYPE: &str = "sedan";

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    Busy,
    Charging,
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Busy => "busy",
            VehicleStatus::Charging => "charging",
            VehicleStatus::Maintenance => "maintenance",
        }
    }

    /// Prioridad para listados: available < busy < charging < maintenance
    pub fn sort_order(&self) -> u8 {
        match self {
            VehicleStatus::Available => 0,
            VehicleStatus::Busy => 1,
            VehicleStatus::Charging => 2,
            VehicleStatus::Maintenance => 3,
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(VehicleStatus::Available),
            "busy" => Ok(VehicleStatus::Busy),
            "charging" => Ok(VehicleStatus::Charging),
            "maintenance" => Ok(VehicleStatus::Maintenance),
            other => Err(format!("unknown vehicle status '{}'", other)),
        }
    }
}

fn default_drain_rate() -> f64 {
    DEFAULT_DRAIN_RATE_KM_PER_PERCENT
}

fn default_vehicle_type() -> String {
    DEFAULT_VEHICLE_TYPE.to_string()
}

/// Vehicle principal del directorio de flota
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub region: String,
    pub status: VehicleStatus,
    pub battery_level: f64,
    pub battery_range_km: f64,
    pub location_lat: f64,
    pub location_lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_job_id: Option<String>,
    #[serde(default = "default_vehicle_type")]
    pub vehicle_type: String,
    #[serde(default = "default_drain_rate")]
    pub drain_rate_km_per_percent: f64,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Vehicle {
    /// Crear un vehículo disponible en `location` con el nivel de batería dado
    pub fn new(id: impl Into<String>, region: impl Into<String>, battery_level: f64, location: GeoPoint) -> Self {
        let mut vehicle = Self {
            id: id.into(),
            region: region.into(),
            status: VehicleStatus::Available,
            battery_level: 0.0,
            battery_range_km: 0.0,
            location_lat: location.lat,
            location_lng: location.lng,
            current_job_id: None,
            vehicle_type: default_vehicle_type(),
            drain_rate_km_per_percent: DEFAULT_DRAIN_RATE_KM_PER_PERCENT,
            last_updated: Utc::now(),
        };
        vehicle.set_battery_level(battery_level);
        vehicle
    }

    pub fn with_drain_rate(mut self, drain_rate_km_per_percent: f64) -> Self {
        self.drain_rate_km_per_percent = drain_rate_km_per_percent;
        self.set_battery_level(self.battery_level);
        self
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.location_lat, self.location_lng)
    }

    /// Fija el nivel de batería (acotado a [0, 100]) y recalcula la autonomía.
    /// Es la única vía para modificar `battery_level`.
    pub fn set_battery_level(&mut self, level: f64) {
        self.battery_level = level.clamp(0.0, 100.0);
        self.battery_range_km = self.battery_level * self.drain_rate_km_per_percent;
    }

    /// Recalcula la autonomía a partir del nivel actual (registros recibidos por la API)
    pub fn normalize_battery(&mut self) {
        self.set_battery_level(self.battery_level);
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_derived_from_level() {
        let mut vehicle = Vehicle::new("v1", "us-west-2", 50.0, GeoPoint::new(0.0, 0.0));
        assert_eq!(vehicle.battery_range_km, 200.0);

        vehicle.set_battery_level(12.5);
        assert_eq!(vehicle.battery_range_km, 50.0);

        vehicle.set_battery_level(-3.0);
        assert_eq!(vehicle.battery_level, 0.0);
        assert_eq!(vehicle.battery_range_km, 0.0);
    }

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [
            VehicleStatus::Available,
            VehicleStatus::Busy,
            VehicleStatus::Charging,
            VehicleStatus::Maintenance,
        ] {
            assert_eq!(status.as_str().parse::<VehicleStatus>().unwrap(), status);
        }
        assert!("offline".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn test_deserialize_registration_payload() {
        let json = r#"{
            "id": "sim-vehicle-1",
            "region": "us-west-2",
            "status": "available",
            "battery_level": 80.5,
            "battery_range_km": 1.0,
            "location_lat": 45.5188,
            "location_lng": -122.6793
        }"#;
        let mut vehicle: Vehicle = serde_json::from_str(json).unwrap();
        vehicle.normalize_battery();
        assert_eq!(vehicle.vehicle_type, "sedan");
        assert_eq!(vehicle.battery_range_km, 322.0);
        assert!(vehicle.current_job_id.is_none());
    }
}
