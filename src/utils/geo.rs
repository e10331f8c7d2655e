//! Utilidades geográficas
//!
//! Distancia great-circle (Haversine) entre coordenadas WGS-84.

use serde::{Deserialize, Serialize};

/// Radio medio de la Tierra en kilómetros
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Punto geográfico (lat, lng) en grados
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Distancia Haversine en kilómetros hasta `other`
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }

    /// Distancia euclidiana en grados. Es la métrica que usa la simulación
    /// para pasos y umbrales de llegada.
    pub fn degree_distance(&self, other: &GeoPoint) -> f64 {
        let lat_diff = other.lat - self.lat;
        let lng_diff = other.lng - self.lng;
        (lat_diff * lat_diff + lng_diff * lng_diff).sqrt()
    }

    /// Interpolación lineal entre `self` y `other` (ratio en [0, 1])
    pub fn lerp(&self, other: &GeoPoint, ratio: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * ratio,
            lng: self.lng + (other.lng - self.lng) * ratio,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Distancia great-circle entre dos puntos en kilómetros
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const SF: (f64, f64) = (37.7749, -122.4194);
    const LA: (f64, f64) = (34.0522, -118.2437);

    #[test]
    fn test_distance_identical_points_is_zero() {
        let points = [SF, LA, (0.0, 0.0), (45.5188, -122.6793), (-33.8688, 151.2093)];
        for (lat, lng) in points {
            assert!(haversine_distance(lat, lng, lat, lng).abs() < 1e-9);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (SF, LA),
            ((45.5188, -122.6793), (45.5898, -122.5951)),
            ((0.0, 0.0), (10.0, 10.0)),
        ];
        for (a, b) in pairs {
            let ab = haversine_distance(a.0, a.1, b.0, b.1);
            let ba = haversine_distance(b.0, b.1, a.0, a.1);
            assert!((ab - ba).abs() < 1e-9);
        }
    }

    #[test]
    fn test_distance_sf_la() {
        let d = haversine_distance(SF.0, SF.1, LA.0, LA.1);
        // ~560 km ±10%
        assert!(d > 504.0 && d < 616.0, "distance was {}", d);
    }

    #[test]
    fn test_geo_point_helpers() {
        let a = GeoPoint::new(37.7749, -122.4194);
        let b = GeoPoint::new(37.7849, -122.4094);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.lat - 37.7799).abs() < 1e-9);
        assert!((a.degree_distance(&b) - (0.0002f64).sqrt()).abs() < 1e-9);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }
}
