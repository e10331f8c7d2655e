pub mod job_controller;
pub mod vehicle_controller;
