//! Clients - comunicación entre servicios
//!
//! Contratos que usan la simulación y el orquestador de jobs para hablar con
//! la flota y el ledger. Cada contrato tiene una implementación en proceso y
//! otra HTTP (reqwest).

pub mod fleet_client;
pub mod job_client;

pub use fleet_client::{FleetClient, HttpFleetClient, LocalFleetClient};
pub use job_client::{HttpJobClient, JobClient, LocalJobClient};

use std::time::Duration;

use reqwest::{Response, StatusCode};

use crate::utils::errors::{AppError, AppResult, ErrorResponse};

/// Timeout por defecto de las llamadas entre servicios
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))
}

/// Traduce una respuesta no exitosa al error de dominio equivalente
pub(crate) async fn error_from_response(response: Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| format!("status {}: {}", status, body));
    let code = parsed.as_ref().map(|e| e.code.as_str()).unwrap_or("");

    match status {
        StatusCode::NOT_FOUND if code == "NO_VEHICLE_AVAILABLE" => AppError::NoVehicleAvailable(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT if code == "INVALID_STATE" => AppError::InvalidState(message),
        StatusCode::CONFLICT => AppError::AlreadyExists(message),
        StatusCode::BAD_REQUEST => AppError::BadRequest(message),
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => AppError::Timeout(message),
        _ => AppError::ExternalApi(message),
    }
}

/// Devuelve la respuesta si es 2xx, o el error mapeado
pub(crate) async fn ensure_success(response: Response) -> AppResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}
