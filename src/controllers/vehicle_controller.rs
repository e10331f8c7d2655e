use validator::Validate;

use crate::dto::vehicle_dto::{AssignJobRequest, FindVehicleQuery, RegisterVehicleRequest, UpdateLocationRequest};
use crate::models::vehicle::Vehicle;
use crate::services::fleet_service::FleetService;
use crate::utils::errors::AppError;

pub struct VehicleController {
    fleet: FleetService,
}

impl VehicleController {
    pub fn new(fleet: FleetService) -> Self {
        Self { fleet }
    }

    pub async fn register(&self, request: RegisterVehicleRequest) -> Result<Vehicle, AppError> {
        request.validate()?;
        self.fleet.register_vehicle(request.into_vehicle()).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Vehicle, AppError> {
        self.fleet.get_vehicle(id).await
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        self.fleet.list_vehicles().await
    }

    pub async fn update_location(&self, id: &str, request: UpdateLocationRequest) -> Result<Vehicle, AppError> {
        request.validate()?;

        self.fleet
            .report_vehicle(id, request.lat, request.lng, request.status, request.battery_level)
            .await
    }

    pub async fn assign(&self, id: &str, request: AssignJobRequest) -> Result<Vehicle, AppError> {
        request.validate()?;
        self.fleet.assign_job(id, &request.job_id).await
    }

    pub async fn reserve(&self, id: &str, request: AssignJobRequest) -> Result<Vehicle, AppError> {
        request.validate()?;
        self.fleet.reserve_vehicle(id, &request.job_id).await
    }

    pub async fn complete(&self, id: &str) -> Result<Vehicle, AppError> {
        self.fleet.complete_job(id).await
    }

    pub async fn find_nearest(&self, query: FindVehicleQuery) -> Result<Vehicle, AppError> {
        query.validate()?;
        self.fleet
            .find_nearest_available_vehicle(&query.region, query.pickup_lat, query.pickup_lng, query.trip_distance_km)
            .await
    }
}
