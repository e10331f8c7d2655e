//! Registro de vehículos en la flota con backoff exponencial

use tokio::time::{sleep, timeout_at, Instant};

use crate::clients::FleetClient;
use crate::config::RetryPolicy;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

/// Registra `vehicle` reintentando con backoff hasta agotar los intentos o el
/// plazo global. Un registro duplicado cuenta como éxito (reinicio del simulador).
pub async fn register_with_retry(
    fleet: &dyn FleetClient,
    vehicle: &Vehicle,
    policy: &RetryPolicy,
) -> AppResult<Vehicle> {
    let deadline = Instant::now() + policy.overall_timeout;

    match timeout_at(deadline, attempt_registration(fleet, vehicle, policy)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(
                vehicle_id = %vehicle.id,
                timeout_secs = policy.overall_timeout.as_secs_f64(),
                "❌ Plazo de registro agotado"
            );
            Err(AppError::Timeout(format!(
                "registration of vehicle {} exceeded {:?}",
                vehicle.id, policy.overall_timeout
            )))
        }
    }
}

async fn attempt_registration(
    fleet: &dyn FleetClient,
    vehicle: &Vehicle,
    policy: &RetryPolicy,
) -> AppResult<Vehicle> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match fleet.register_vehicle(vehicle).await {
            Ok(registered) => {
                tracing::info!(vehicle_id = %vehicle.id, attempt, "✅ Vehículo registrado en la flota");
                return Ok(registered);
            }
            Err(AppError::AlreadyExists(_)) => {
                tracing::info!(vehicle_id = %vehicle.id, "🔄 Vehículo ya registrado, continuando");
                return Ok(vehicle.clone());
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!(vehicle_id = %vehicle.id, attempts = attempt, error = %e, "❌ Registro fallido tras agotar los intentos");
                return Err(e);
            }
            Err(e) => {
                let delay = policy.jittered_delay(attempt);
                tracing::warn!(
                    vehicle_id = %vehicle.id,
                    attempt,
                    max_attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %e,
                    "⏳ Registro fallido, reintentando"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
