//! DTOs de la API HTTP

pub mod job_dto;
pub mod vehicle_dto;

pub use job_dto::*;
pub use vehicle_dto::*;
