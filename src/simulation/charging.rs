//! Estaciones de carga por región

use serde::Serialize;

use crate::utils::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingStation {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

impl ChargingStation {
    fn new(id: &str, lat: f64, lng: f64) -> Self {
        Self {
            id: id.to_string(),
            lat,
            lng,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Estaciones conocidas para `region` (Portland en us-west-2, San Francisco en el resto)
pub fn charging_stations(region: &str) -> Vec<ChargingStation> {
    match region {
        "us-west-2" => vec![
            ChargingStation::new("pioneer-place", 45.5188, -122.6746),
            ChargingStation::new("lloyd-center", 45.5311, -122.6536),
            ChargingStation::new("ohsu-campus", 45.4993, -122.6859),
            ChargingStation::new("pdx-airport", 45.5898, -122.5951),
            ChargingStation::new("hawthorne-whole-foods", 45.5122, -122.6208),
        ],
        _ => vec![
            ChargingStation::new("default-station-1", 37.7749, -122.4194),
            ChargingStation::new("default-station-2", 37.7849, -122.4094),
        ],
    }
}

/// Estación más cercana a `position` dentro de `stations`; si la lista está
/// vacía se devuelve una estación de emergencia en la propia posición.
pub fn nearest_station(stations: &[ChargingStation], position: GeoPoint) -> ChargingStation {
    stations
        .iter()
        .map(|s| (s, position.distance_km(&s.location())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, _)| s.clone())
        .unwrap_or_else(|| ChargingStation::new("emergency-station", position.lat, position.lng))
}

pub fn find_nearest_charging_station(region: &str, position: GeoPoint) -> ChargingStation {
    nearest_station(&charging_stations(region), position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portland_nearest_station() {
        let station = find_nearest_charging_station("us-west-2", GeoPoint::new(45.588, -122.60));
        assert_eq!(station.id, "pdx-airport");

        let downtown = find_nearest_charging_station("us-west-2", GeoPoint::new(45.5189, -122.6790));
        assert_eq!(downtown.id, "pioneer-place");
    }

    #[test]
    fn test_other_regions_use_default_stations() {
        let station = find_nearest_charging_station("eu-west-1", GeoPoint::new(37.785, -122.41));
        assert_eq!(station.id, "default-station-2");
    }

    #[test]
    fn test_empty_list_yields_emergency_station() {
        let station = nearest_station(&[], GeoPoint::new(1.0, 2.0));
        assert_eq!(station.id, "emergency-station");
        assert_eq!(station.location(), GeoPoint::new(1.0, 2.0));
    }
}
