use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{AssignJobRequest, FindVehicleQuery, RegisterVehicleRequest, UpdateLocationRequest};
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_vehicle))
        .route("/", get(list_vehicles))
        .route("/find", get(find_nearest_vehicle))
        .route("/:id", get(get_vehicle))
        .route("/:id/location", put(update_location))
        .route("/:id/assign", post(assign_job))
        .route("/:id/reserve", post(reserve_vehicle))
        .route("/:id/complete", post(complete_job))
}

fn controller(state: &AppState) -> Result<VehicleController, AppError> {
    Ok(VehicleController::new(state.fleet()?))
}

async fn register_vehicle(
    State(state): State<AppState>,
    Json(request): Json<RegisterVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let vehicle = controller(&state)?.register(request).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    Ok(Json(controller(&state)?.list().await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(controller(&state)?.get_by_id(&id).await?))
}

async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(controller(&state)?.update_location(&id, request).await?))
}

async fn assign_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignJobRequest>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(controller(&state)?.assign(&id, request).await?))
}

async fn reserve_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignJobRequest>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(controller(&state)?.reserve(&id, request).await?))
}

async fn complete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(controller(&state)?.complete(&id).await?))
}

async fn find_nearest_vehicle(
    State(state): State<AppState>,
    Query(query): Query<FindVehicleQuery>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(controller(&state)?.find_nearest(query).await?))
}
