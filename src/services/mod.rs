//! Services module
//!
//! Este módulo contiene la lógica de negocio: directorio de flota, dispatch,
//! orquestación de jobs, precios, rutas y telemetría.

pub mod demo_service;
pub mod dispatch_service;
pub mod fleet_service;
pub mod job_processor;
pub mod job_service;
pub mod pricing_service;
pub mod routing_service;
pub mod telemetry_service;

pub use dispatch_service::Dispatcher;
pub use fleet_service::FleetService;
pub use job_processor::JobProcessor;
pub use job_service::JobService;
pub use routing_service::{OsrmRouteProvider, RouteProvider, RoutingService};
pub use telemetry_service::{ChannelEventSink, EventSink, NoopEventSink, TracingEventSink};
