//! Fleet dispatch
//!
//! Despacho de una flota de vehículos autónomos: directorio de flota,
//! dispatcher por cercanía y autonomía, ledger y orquestador de jobs, y un
//! simulador de vehículos que recoge y entrega jobs.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod simulation;
pub mod state;
pub mod utils;
