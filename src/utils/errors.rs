//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("No vehicle available: {0}")]
    NoVehicleAvailable(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Código estable para clientes y logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::NoVehicleAvailable(_) => "NO_VEHICLE_AVAILABLE",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::ExternalApi(_) => "EXTERNAL_API_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::NoVehicleAvailable(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) | AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout(e.to_string())
        } else {
            AppError::ExternalApi(e.to_string())
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Internal(_) | AppError::ExternalApi(_) | AppError::Timeout(_) => {
                tracing::error!("❌ {}", self)
            }
            _ => tracing::warn!("⚠️ {}", self),
        }

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: self.to_string(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de duplicado
pub fn conflict_error(resource: &str, id: &str) -> AppError {
    AppError::AlreadyExists(format!("{} with id '{}' already exists", resource, id))
}

/// Función helper para crear errores de transición inválida
pub fn invalid_state_error(resource: &str, id: &str, current: &str) -> AppError {
    AppError::InvalidState(format!(
        "{} '{}' cannot transition from status '{}'",
        resource, id, current
    ))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(not_found_error("vehicle", "v1").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(conflict_error("vehicle", "v1").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            invalid_state_error("job", "ride-1", "pending").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(bad_request_error("x").status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_helper_messages() {
        let err = not_found_error("vehicle", "v1");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: vehicle with id 'v1' not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
