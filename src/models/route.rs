//! Modelo de Route
//!
//! Ruta efímera que la simulación consume waypoint a waypoint.

use serde::{Deserialize, Serialize};

use crate::utils::geo::GeoPoint;

/// Ruta con waypoints ordenados, distancia total (metros) y duración (segundos)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub points: Vec<GeoPoint>,
    pub distance: f64,
    pub duration: f64,
}

impl Route {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration / 60.0
    }

    pub fn last(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }
}
