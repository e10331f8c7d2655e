//! Repositorios
//!
//! Almacenes compartidos entre servicios: directorio de flota y ledger de jobs.

pub mod job_repository;
pub mod vehicle_repository;

pub use job_repository::{InMemoryJobRepository, JobRepository};
pub use vehicle_repository::{InMemoryVehicleRepository, VehicleRepository};
