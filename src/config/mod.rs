//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno, los parámetros de la
//! simulación y las tarifas.

pub mod environment;
pub mod pricing;
pub mod simulation;

pub use environment::*;
pub use pricing::PricingConfig;
pub use simulation::{RetryPolicy, SimulationConfig};
