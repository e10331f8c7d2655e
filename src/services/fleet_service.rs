//! Servicio de flota
//!
//! Operaciones de negocio sobre el directorio de flota: registro, reportes
//! de posición, asignación/liberación de jobs y búsqueda del vehículo más
//! cercano.

use std::sync::Arc;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::VehicleRepository;
use crate::services::dispatch_service::Dispatcher;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct FleetService {
    vehicles: Arc<dyn VehicleRepository>,
    dispatcher: Dispatcher,
}

impl FleetService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>) -> Self {
        let dispatcher = Dispatcher::new(vehicles.clone());
        Self { vehicles, dispatcher }
    }

    /// Registrar un vehículo nuevo (falla si el id ya existe)
    pub async fn register_vehicle(&self, vehicle: Vehicle) -> AppResult<Vehicle> {
        let created = self.vehicles.create(vehicle).await?;
        log::info!(
            "✅ Vehículo {} registrado en {} (batería {:.1}%, autonomía {:.1} km)",
            created.id,
            created.region,
            created.battery_level,
            created.battery_range_km
        );
        Ok(created)
    }

    pub async fn get_vehicle(&self, vehicle_id: &str) -> AppResult<Vehicle> {
        self.vehicles.get(vehicle_id).await
    }

    /// Todos los vehículos ordenados por prioridad de estado y luego por id
    pub async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let mut vehicles = self.vehicles.list_all().await?;
        vehicles.sort_by(|a, b| {
            a.status
                .sort_order()
                .cmp(&b.status.sort_order())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(vehicles)
    }

    /// Reporte de un vehículo: posición, estado opcional y batería opcional,
    /// aplicados juntos. Un `available` sobre una reserva pendiente se ignora.
    pub async fn report_vehicle(
        &self,
        vehicle_id: &str,
        lat: f64,
        lng: f64,
        status: Option<VehicleStatus>,
        battery_level: Option<f64>,
    ) -> AppResult<Vehicle> {
        let updated = self
            .vehicles
            .report(vehicle_id, lat, lng, status, battery_level)
            .await?;

        if status == Some(VehicleStatus::Available) && updated.status == VehicleStatus::Busy {
            log::debug!(
                "🔒 Vehículo {} reporta available pero conserva la reserva {:?}",
                vehicle_id,
                updated.current_job_id
            );
        }
        Ok(updated)
    }

    /// Marcar el vehículo `busy` con el job
    pub async fn assign_job(&self, vehicle_id: &str, job_id: &str) -> AppResult<Vehicle> {
        let vehicle = self
            .vehicles
            .update_status(vehicle_id, VehicleStatus::Busy, Some(job_id.to_string()))
            .await?;
        log::info!("🚕 Job {} asignado al vehículo {}", job_id, vehicle_id);
        Ok(vehicle)
    }

    /// Igual que `assign_job` pero solo si el vehículo sigue `available`
    pub async fn reserve_vehicle(&self, vehicle_id: &str, job_id: &str) -> AppResult<Vehicle> {
        let vehicle = self.vehicles.reserve_for_job(vehicle_id, job_id).await?;
        log::info!("🔒 Vehículo {} reservado para el job {}", vehicle_id, job_id);
        Ok(vehicle)
    }

    /// Liberar el vehículo tras completar su job
    pub async fn complete_job(&self, vehicle_id: &str) -> AppResult<Vehicle> {
        let vehicle = self
            .vehicles
            .update_status(vehicle_id, VehicleStatus::Available, None)
            .await?;
        log::info!("🏁 Vehículo {} liberado", vehicle_id);
        Ok(vehicle)
    }

    pub async fn find_nearest_available_vehicle(
        &self,
        region: &str,
        pickup_lat: f64,
        pickup_lng: f64,
        trip_distance_km: f64,
    ) -> AppResult<Vehicle> {
        self.dispatcher
            .find_nearest(region, pickup_lat, pickup_lng, trip_distance_km)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryVehicleRepository;
    use crate::utils::errors::AppError;
    use crate::utils::geo::GeoPoint;

    fn service() -> FleetService {
        FleetService::new(Arc::new(InMemoryVehicleRepository::new()))
    }

    #[tokio::test]
    async fn test_assign_and_complete_round_trip() {
        let fleet = service();
        fleet
            .register_vehicle(Vehicle::new("v1", "us-west-2", 80.0, GeoPoint::new(37.7749, -122.4194)))
            .await
            .unwrap();

        let busy = fleet.assign_job("v1", "ride-1").await.unwrap();
        assert_eq!(busy.status, VehicleStatus::Busy);
        assert_eq!(busy.current_job_id.as_deref(), Some("ride-1"));

        let free = fleet.complete_job("v1").await.unwrap();
        assert_eq!(free.status, VehicleStatus::Available);
        assert!(free.current_job_id.is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_status_then_id() {
        let fleet = service();
        for id in ["v3", "v1", "v2", "v4"] {
            fleet
                .register_vehicle(Vehicle::new(id, "us-west-2", 80.0, GeoPoint::new(0.0, 0.0)))
                .await
                .unwrap();
        }
        fleet.assign_job("v1", "ride-1").await.unwrap();
        fleet
            .report_vehicle("v2", 0.0, 0.0, Some(VehicleStatus::Maintenance), None)
            .await
            .unwrap();

        let ids: Vec<String> = fleet
            .list_vehicles()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec!["v3", "v4", "v1", "v2"]);
    }

    #[tokio::test]
    async fn test_report_updates_battery_range() {
        let fleet = service();
        fleet
            .register_vehicle(Vehicle::new("v1", "us-west-2", 80.0, GeoPoint::new(0.0, 0.0)))
            .await
            .unwrap();

        let reported = fleet
            .report_vehicle("v1", 0.001, 0.002, Some(VehicleStatus::Charging), Some(25.0))
            .await
            .unwrap();
        assert_eq!(reported.status, VehicleStatus::Charging);
        assert_eq!(reported.battery_range_km, 100.0);
        assert_eq!(reported.location_lng, 0.002);
    }

    #[tokio::test]
    async fn test_stale_available_report_does_not_free_reserved_vehicle() {
        let fleet = service();
        fleet
            .register_vehicle(Vehicle::new("v1", "us-west-2", 80.0, GeoPoint::new(37.7749, -122.4194)))
            .await
            .unwrap();
        fleet.reserve_vehicle("v1", "ride-1").await.unwrap();

        let reported = fleet
            .report_vehicle("v1", 37.775, -122.419, Some(VehicleStatus::Available), Some(79.0))
            .await
            .unwrap();
        assert_eq!(reported.status, VehicleStatus::Busy);
        assert_eq!(reported.current_job_id.as_deref(), Some("ride-1"));

        let err = fleet
            .find_nearest_available_vehicle("us-west-2", 37.7749, -122.4194, 5.0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoVehicleAvailable(_)));

        fleet.complete_job("v1").await.unwrap();
        let found = fleet
            .find_nearest_available_vehicle("us-west-2", 37.7749, -122.4194, 5.0)
            .await
            .unwrap();
        assert_eq!(found.id, "v1");
    }

    #[tokio::test]
    async fn test_find_nearest_without_vehicles() {
        let fleet = service();
        let err = fleet
            .find_nearest_available_vehicle("us-west-2", 37.7649, -122.4294, 50.0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoVehicleAvailable(_)));
    }
}
