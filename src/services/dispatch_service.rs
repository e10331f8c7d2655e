//! Dispatcher
//!
//! Selección de solo lectura del mejor vehículo para un job: el disponible
//! más cercano al punto de recogida cuya autonomía cubre
//! `(distancia_a_recogida + distancia_del_viaje) × 1.2`. No reserva nada; la
//! asignación es una llamada aparte.

use std::sync::Arc;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::GeoPoint;

/// Margen sobre (aproximación + viaje)
pub const SAFETY_BUFFER: f64 = 1.2;

/// Candidato elegido y su distancia a la recogida
#[derive(Debug, Clone)]
pub struct DispatchCandidate {
    pub vehicle: Vehicle,
    pub distance_to_pickup_km: f64,
}

/// Autonomía necesaria para llegar a la recogida y completar el viaje
pub fn required_range_km(distance_to_pickup_km: f64, trip_distance_km: f64) -> f64 {
    (distance_to_pickup_km + trip_distance_km) * SAFETY_BUFFER
}

/// Elige el candidato más cercano con autonomía suficiente.
/// En empate gana el id lexicográficamente menor.
pub fn select_nearest<'a, I>(vehicles: I, pickup: GeoPoint, trip_distance_km: f64) -> Option<DispatchCandidate>
where
    I: IntoIterator<Item = &'a Vehicle>,
{
    let mut best: Option<(&Vehicle, f64)> = None;

    for vehicle in vehicles {
        let distance_to_pickup = vehicle.location().distance_km(&pickup);
        if vehicle.battery_range_km < required_range_km(distance_to_pickup, trip_distance_km) {
            continue;
        }

        let better = match best {
            None => true,
            Some((current, current_distance)) => {
                distance_to_pickup < current_distance
                    || (distance_to_pickup == current_distance && vehicle.id < current.id)
            }
        };
        if better {
            best = Some((vehicle, distance_to_pickup));
        }
    }

    best.map(|(vehicle, distance)| DispatchCandidate {
        vehicle: vehicle.clone(),
        distance_to_pickup_km: distance,
    })
}

#[derive(Clone)]
pub struct Dispatcher {
    vehicles: Arc<dyn VehicleRepository>,
}

impl Dispatcher {
    pub fn new(vehicles: Arc<dyn VehicleRepository>) -> Self {
        Self { vehicles }
    }

    pub async fn find_nearest(
        &self,
        region: &str,
        pickup_lat: f64,
        pickup_lng: f64,
        trip_distance_km: f64,
    ) -> AppResult<Vehicle> {
        let available = self
            .vehicles
            .query_by_region_and_status(region, VehicleStatus::Available)
            .await?;

        let pickup = GeoPoint::new(pickup_lat, pickup_lng);
        match select_nearest(&available, pickup, trip_distance_km) {
            Some(candidate) => {
                log::debug!(
                    "🚗 Vehículo {} seleccionado a {:.2} km de la recogida",
                    candidate.vehicle.id,
                    candidate.distance_to_pickup_km
                );
                Ok(candidate.vehicle)
            }
            None => Err(AppError::NoVehicleAvailable(format!(
                "no available vehicle in region '{}' with sufficient battery for a {:.2} km trip ({} candidates)",
                region,
                trip_distance_km,
                available.len()
            ))),
        }
    }
}
