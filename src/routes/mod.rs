//! Rutas HTTP
//!
//! Las rutas de flota y de jobs solo se montan si el servicio
//! correspondiente corre en este proceso.

pub mod job_routes;
pub mod vehicle_routes;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware_with_origins;
use crate::state::AppState;

pub fn create_app_router(state: AppState) -> Router {
    let mut router = Router::new().route("/health", get(health));

    if state.fleet.is_some() {
        router = router.nest("/vehicles", vehicle_routes::create_vehicle_router());
    }
    if state.jobs.is_some() {
        router = router
            .nest("/jobs", job_routes::create_job_router())
            .nest("/revenue", job_routes::create_revenue_router());
    }

    let cors = cors_middleware_with_origins(&state.config.cors_origins);
    router
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service_mode": state.config.service_mode.as_str(),
        "fleet": state.fleet.is_some(),
        "jobs": state.jobs.is_some(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
