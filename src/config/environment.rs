//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables
//! tienen un valor por defecto; un valor mal formado se ignora con un aviso.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Componentes que arranca el binario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    /// Directorio de flota, ledger de jobs y simulador en un solo proceso
    All,
    /// Solo el servicio de flota
    Fleet,
    /// Solo el servicio de jobs (habla con la flota por HTTP)
    Jobs,
    /// Solo los vehículos simulados (hablan con flota y jobs por HTTP)
    Simulator,
}

impl ServiceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMode::All => "all",
            ServiceMode::Fleet => "fleet",
            ServiceMode::Jobs => "jobs",
            ServiceMode::Simulator => "simulator",
        }
    }
}

impl FromStr for ServiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ServiceMode::All),
            "fleet" => Ok(ServiceMode::Fleet),
            "jobs" | "job" => Ok(ServiceMode::Jobs),
            "simulator" | "sim" => Ok(ServiceMode::Simulator),
            other => Err(format!("unknown service mode '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub service_mode: ServiceMode,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub fleet_service_url: String,
    pub job_service_url: String,
    pub region: String,
    pub vehicle_count: usize,
    pub start_lat: f64,
    pub start_lng: f64,
    pub osrm_url: Option<String>,
    pub routing_timeout: Duration,
    pub demo_mode: bool,
    pub demo_interval: Duration,
    pub processor_interval: Duration,
    pub sim_tick: Duration,
    pub demo_speed: Option<f64>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env_or("ENVIRONMENT", "development".to_string()),
            service_mode: env_or("SERVICE_MODE", ServiceMode::All),
            port: env_or("PORT", 8080),
            host: env_or("HOST", "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            fleet_service_url: env_or("FLEET_SERVICE_URL", "http://localhost:8080".to_string()),
            job_service_url: env_or("JOB_SERVICE_URL", "http://localhost:8081".to_string()),
            region: env_or("REGION", "us-west-2".to_string()),
            vehicle_count: env_or("VEHICLE_COUNT", 1),
            start_lat: env_or("START_LAT", 37.7749),
            start_lng: env_or("START_LNG", -122.4194),
            osrm_url: env::var("OSRM_URL").ok().filter(|s| !s.trim().is_empty()),
            routing_timeout: Duration::from_secs(env_or("ROUTING_TIMEOUT_SECS", 5)),
            demo_mode: env_or("DEMO_MODE", false),
            demo_interval: Duration::from_secs(env_or("DEMO_INTERVAL_SECS", 15)),
            processor_interval: Duration::from_secs(env_or("PROCESSOR_INTERVAL_SECS", 5)),
            sim_tick: Duration::from_millis(env_or("SIM_TICK_MS", 2000)),
            demo_speed: env::var("DEMO_SPEED").ok().and_then(|v| v.parse().ok()),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn runs_fleet(&self) -> bool {
        matches!(self.service_mode, ServiceMode::All | ServiceMode::Fleet)
    }

    pub fn runs_jobs(&self) -> bool {
        matches!(self.service_mode, ServiceMode::All | ServiceMode::Jobs)
    }

    pub fn runs_simulator(&self) -> bool {
        matches!(self.service_mode, ServiceMode::All | ServiceMode::Simulator)
    }
}

/// Leer una variable de entorno con valor por defecto
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("⚠️ Valor inválido para {}: '{}', usando el valor por defecto", key, raw);
                default
            }
        },
        _ => default,
    }
}
