//! Simulation module
//!
//! Vehículos autónomos simulados: movimiento por rutas, consumo y carga de
//! batería, recogida y entrega de jobs.

pub mod charging;
pub mod registration;
pub mod runner;
pub mod spawn;
pub mod vehicle;

pub use charging::{find_nearest_charging_station, ChargingStation};
pub use registration::register_with_retry;
pub use runner::FleetSimulator;
pub use vehicle::{SimulatedVehicle, SimulationContext, VehiclePhase};
