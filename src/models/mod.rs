//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos compartidos por el directorio
//! de flota, el ledger de jobs y la simulación.

pub mod analytics;
pub mod events;
pub mod job;
pub mod route;
pub mod vehicle;

pub use analytics::RevenueReport;
pub use events::{FleetEvent, JobEvent, JobEventType, VehicleTelemetry};
pub use job::{DeliveryDetails, Fare, Job, JobStatus, JobType, NewJob};
pub use route::Route;
pub use vehicle::{Vehicle, VehicleStatus};
