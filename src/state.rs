//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Cada servicio es opcional: solo existe si el
//! modo de ejecución lo sirve desde este proceso.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::fleet_service::FleetService;
use crate::services::job_service::JobService;
use crate::utils::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub fleet: Option<FleetService>,
    pub jobs: Option<Arc<JobService>>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, fleet: Option<FleetService>, jobs: Option<Arc<JobService>>) -> Self {
        Self { config, fleet, jobs }
    }

    pub fn fleet(&self) -> AppResult<FleetService> {
        self.fleet.clone().ok_or_else(|| {
            AppError::Internal(format!(
                "fleet service is not enabled in mode '{}'",
                self.config.service_mode.as_str()
            ))
        })
    }

    pub fn jobs(&self) -> AppResult<Arc<JobService>> {
        self.jobs.clone().ok_or_else(|| {
            AppError::Internal(format!(
                "job service is not enabled in mode '{}'",
                self.config.service_mode.as_str()
            ))
        })
    }
}
