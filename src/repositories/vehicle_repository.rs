//! Directorio de flota
//!
//! Almacén de vehículos con consultas por región y estado. Cada operación se
//! ejecuta dentro de una única sección crítica, así que nunca se observa un
//! cambio a medio aplicar.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::{conflict_error, invalid_state_error, not_found_error, AppResult};

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Falla con `AlreadyExists` si el id ya está registrado
    async fn create(&self, vehicle: Vehicle) -> AppResult<Vehicle>;

    async fn get(&self, id: &str) -> AppResult<Vehicle>;

    async fn update_location(&self, id: &str, lat: f64, lng: f64) -> AppResult<Vehicle>;

    /// Si el nuevo estado no es `busy` se limpia `current_job_id` en el mismo paso
    async fn update_location_and_status(
        &self,
        id: &str,
        lat: f64,
        lng: f64,
        status: VehicleStatus,
    ) -> AppResult<Vehicle>;

    /// Reporte de un vehículo: posición, estado y batería en una sola sección
    /// crítica. Sin `status` se conserva el actual. Un `available` no pisa una
    /// reserva (`busy` con job): el vehículo la recoge en su siguiente consulta
    /// y se libera con `update_status`.
    async fn report(
        &self,
        id: &str,
        lat: f64,
        lng: f64,
        status: Option<VehicleStatus>,
        battery_level: Option<f64>,
    ) -> AppResult<Vehicle>;

    /// Estado y job se fijan juntos
    async fn update_status(
        &self,
        id: &str,
        status: VehicleStatus,
        job_id: Option<String>,
    ) -> AppResult<Vehicle>;

    /// Compare-and-set: marca el vehículo `busy` con el job solo si sigue `available`
    async fn reserve_for_job(&self, id: &str, job_id: &str) -> AppResult<Vehicle>;

    async fn query_by_region_and_status(
        &self,
        region: &str,
        status: VehicleStatus,
    ) -> AppResult<Vec<Vehicle>>;

    async fn list_all(&self) -> AppResult<Vec<Vehicle>>;
}

/// Implementación en memoria (HashMap protegido por RwLock)
#[derive(Default)]
pub struct InMemoryVehicleRepository {
    vehicles: RwLock<HashMap<String, Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mutate<F>(&self, id: &str, apply: F) -> AppResult<Vehicle>
    where
        F: FnOnce(&mut Vehicle) -> AppResult<()> + Send,
    {
        let mut vehicles = self.vehicles.write().await;
        let vehicle = vehicles
            .get_mut(id)
            .ok_or_else(|| not_found_error("Vehicle", id))?;
        apply(vehicle)?;
        vehicle.touch();
        Ok(vehicle.clone())
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn create(&self, mut vehicle: Vehicle) -> AppResult<Vehicle> {
        let mut vehicles = self.vehicles.write().await;
        if vehicles.contains_key(&vehicle.id) {
            return Err(conflict_error("Vehicle", &vehicle.id));
        }
        vehicle.normalize_battery();
        vehicle.touch();
        vehicles.insert(vehicle.id.clone(), vehicle.clone());
        Ok(vehicle)
    }

    async fn get(&self, id: &str) -> AppResult<Vehicle> {
        self.vehicles
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found_error("Vehicle", id))
    }

    async fn update_location(&self, id: &str, lat: f64, lng: f64) -> AppResult<Vehicle> {
        self.mutate(id, |v| {
            v.location_lat = lat;
            v.location_lng = lng;
            Ok(())
        })
        .await
    }

    async fn update_location_and_status(
        &self,
        id: &str,
        lat: f64,
        lng: f64,
        status: VehicleStatus,
    ) -> AppResult<Vehicle> {
        self.mutate(id, |v| {
            v.location_lat = lat;
            v.location_lng = lng;
            v.status = status;
            if status != VehicleStatus::Busy {
                v.current_job_id = None;
            }
            Ok(())
        })
        .await
    }

    async fn report(
        &self,
        id: &str,
        lat: f64,
        lng: f64,
        status: Option<VehicleStatus>,
        battery_level: Option<f64>,
    ) -> AppResult<Vehicle> {
        self.mutate(id, |v| {
            v.location_lat = lat;
            v.location_lng = lng;
            if let Some(status) = status {
                let reserved = v.status == VehicleStatus::Busy && v.current_job_id.is_some();
                if !(reserved && status == VehicleStatus::Available) {
                    v.status = status;
                    if status != VehicleStatus::Busy {
                        v.current_job_id = None;
                    }
                }
            }
            if let Some(level) = battery_level {
                v.set_battery_level(level);
            }
            Ok(())
        })
        .await
    }

    async fn update_status(
        &self,
        id: &str,
        status: VehicleStatus,
        job_id: Option<String>,
    ) -> AppResult<Vehicle> {
        self.mutate(id, |v| {
            v.status = status;
            v.current_job_id = job_id;
            Ok(())
        })
        .await
    }

    async fn reserve_for_job(&self, id: &str, job_id: &str) -> AppResult<Vehicle> {
        self.mutate(id, |v| {
            if v.status != VehicleStatus::Available {
                return Err(invalid_state_error("Vehicle", &v.id, v.status.as_str()));
            }
            v.status = VehicleStatus::Busy;
            v.current_job_id = Some(job_id.to_string());
            Ok(())
        })
        .await
    }

    async fn query_by_region_and_status(
        &self,
        region: &str,
        status: VehicleStatus,
    ) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles
            .values()
            .filter(|v| v.region == region && v.status == status)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Vehicle>> {
        Ok(self.vehicles.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use crate::utils::geo::GeoPoint;
    use std::sync::Arc;

    fn vehicle(id: &str, region: &str) -> Vehicle {
        Vehicle::new(id, region, 80.0, GeoPoint::new(37.7749, -122.4194))
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let repo = InMemoryVehicleRepository::new();
        repo.create(vehicle("v1", "us-west-2")).await.unwrap();

        let err = repo.create(vehicle("v1", "us-west-2")).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let repo = InMemoryVehicleRepository::new();
        let err = repo.get("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_status_and_job_change_together() {
        let repo = InMemoryVehicleRepository::new();
        repo.create(vehicle("v1", "us-west-2")).await.unwrap();

        let busy = repo
            .update_status("v1", VehicleStatus::Busy, Some("ride-1".to_string()))
            .await
            .unwrap();
        assert_eq!(busy.status, VehicleStatus::Busy);
        assert_eq!(busy.current_job_id.as_deref(), Some("ride-1"));

        let charging = repo
            .report("v1", 37.78, -122.41, Some(VehicleStatus::Charging), None)
            .await
            .unwrap();
        assert_eq!(charging.status, VehicleStatus::Charging);
        assert!(charging.current_job_id.is_none());
        assert_eq!(charging.location_lat, 37.78);

        repo.update_status("v1", VehicleStatus::Busy, Some("ride-2".to_string()))
            .await
            .unwrap();
        let freed = repo
            .update_location_and_status("v1", 37.79, -122.40, VehicleStatus::Available)
            .await
            .unwrap();
        assert_eq!(freed.status, VehicleStatus::Available);
        assert!(freed.current_job_id.is_none());
    }

    #[tokio::test]
    async fn test_available_report_keeps_reservation() {
        let repo = InMemoryVehicleRepository::new();
        repo.create(vehicle("v1", "us-west-2")).await.unwrap();
        repo.reserve_for_job("v1", "ride-1").await.unwrap();

        let reported = repo
            .report("v1", 37.78, -122.41, Some(VehicleStatus::Available), Some(70.0))
            .await
            .unwrap();
        assert_eq!(reported.status, VehicleStatus::Busy);
        assert_eq!(reported.current_job_id.as_deref(), Some("ride-1"));
        assert_eq!(reported.location_lat, 37.78);
        assert_eq!(reported.battery_level, 70.0);

        let err = repo.reserve_for_job("v1", "ride-2").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let freed = repo
            .update_status("v1", VehicleStatus::Available, None)
            .await
            .unwrap();
        assert_eq!(freed.status, VehicleStatus::Available);
        assert!(freed.current_job_id.is_none());
    }

    #[tokio::test]
    async fn test_report_without_status_keeps_current() {
        let repo = InMemoryVehicleRepository::new();
        repo.create(vehicle("v1", "us-west-2")).await.unwrap();
        repo.update_status("v1", VehicleStatus::Maintenance, None).await.unwrap();

        let reported = repo.report("v1", 1.0, 2.0, None, None).await.unwrap();
        assert_eq!(reported.status, VehicleStatus::Maintenance);
        assert_eq!(reported.location_lng, 2.0);
    }

    #[tokio::test]
    async fn test_mutations_refresh_last_updated() {
        let repo = InMemoryVehicleRepository::new();
        let created = repo.create(vehicle("v1", "us-west-2")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let moved = repo.update_location("v1", 1.0, 2.0).await.unwrap();
        assert!(moved.last_updated > created.last_updated);
    }

    #[tokio::test]
    async fn test_reserve_only_succeeds_once() {
        let repo = InMemoryVehicleRepository::new();
        repo.create(vehicle("v1", "us-west-2")).await.unwrap();

        repo.reserve_for_job("v1", "ride-1").await.unwrap();
        let err = repo.reserve_for_job("v1", "ride-2").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let stored = repo.get("v1").await.unwrap();
        assert_eq!(stored.current_job_id.as_deref(), Some("ride-1"));
    }

    #[tokio::test]
    async fn test_report_recomputes_range_with_status() {
        let repo = InMemoryVehicleRepository::new();
        repo.create(vehicle("v1", "us-west-2")).await.unwrap();
        let updated = repo
            .report("v1", 1.0, 2.0, Some(VehicleStatus::Charging), Some(33.3))
            .await
            .unwrap();
        assert_eq!(updated.status, VehicleStatus::Charging);
        assert!((updated.battery_range_km - 133.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_query_filters_region_and_status() {
        let repo = InMemoryVehicleRepository::new();
        repo.create(vehicle("v1", "us-west-2")).await.unwrap();
        repo.create(vehicle("v2", "us-west-2")).await.unwrap();
        repo.create(vehicle("v3", "eu-west-1")).await.unwrap();
        repo.update_status("v2", VehicleStatus::Charging, None).await.unwrap();

        let available = repo
            .query_by_region_and_status("us-west-2", VehicleStatus::Available)
            .await
            .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, "v1");
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_updates_on_different_keys() {
        let repo = Arc::new(InMemoryVehicleRepository::new());
        for i in 0..20 {
            repo.create(vehicle(&format!("v{}", i), "us-west-2")).await.unwrap();
        }

        let mut handles = Vec::new();
        for i in 0..20 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("v{}", i);
                for step in 0..50 {
                    repo.report(&id, step as f64 * 0.001, i as f64, None, None)
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 20);
        for v in all {
            let i: f64 = v.id[1..].parse().unwrap();
            assert_eq!(v.location_lng, i);
            assert!((v.location_lat - 0.049).abs() < 1e-12);
        }
    }
}
