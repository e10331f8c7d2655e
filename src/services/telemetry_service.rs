//! Sink de eventos de telemetría
//!
//! Emisión fire-and-forget de posiciones de vehículos y eventos de jobs.
//! Un fallo en el sink se registra y se descarta; nunca afecta al estado.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use crate::models::events::FleetEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: FleetEvent);
}

/// Descarta todos los eventos
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: FleetEvent) {}
}

/// Registra cada evento como una línea de log estructurada
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: FleetEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => tracing::debug!(target: "fleet_events", kind = event.kind(), %payload, "📡 Evento"),
            Err(e) => tracing::warn!(target: "fleet_events", error = %e, "⚠️ No se pudo serializar el evento"),
        }
    }
}

/// Publica en un canal acotado; si está lleno o cerrado el evento se pierde
pub struct ChannelEventSink {
    sender: mpsc::Sender<FleetEvent>,
    dropped: AtomicU64,
}

impl ChannelEventSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<FleetEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self {
                sender,
                dropped: AtomicU64::new(0),
            },
            receiver,
        )
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: FleetEvent) {
        if let Err(e) = self.sender.try_send(event) {
            let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::warn!(dropped = total, "⚠️ Evento descartado: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events::VehicleTelemetry;
    use crate::models::vehicle::VehicleStatus;

    fn telemetry() -> FleetEvent {
        FleetEvent::VehicleTelemetry(VehicleTelemetry::new(
            "v1",
            "us-west-2",
            45.5,
            -122.6,
            VehicleStatus::Available,
            80.0,
        ))
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_events() {
        let (sink, mut rx) = ChannelEventSink::new(4);
        sink.emit(telemetry());

        match rx.recv().await {
            Some(FleetEvent::VehicleTelemetry(t)) => assert_eq!(t.vehicle_id, "v1"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_channel_sink_drops_when_full() {
        let (sink, _rx) = ChannelEventSink::new(1);
        sink.emit(telemetry());
        sink.emit(telemetry());
        sink.emit(telemetry());
        assert_eq!(sink.dropped(), 2);
    }

    #[tokio::test]
    async fn test_channel_sink_survives_closed_receiver() {
        let (sink, rx) = ChannelEventSink::new(1);
        drop(rx);
        sink.emit(telemetry());
        assert_eq!(sink.dropped(), 1);
    }

    #[test]
    fn test_event_serializes_with_kind_tag() {
        let json = serde_json::to_value(telemetry()).unwrap();
        assert_eq!(json["kind"], "vehicle_telemetry");
        assert_eq!(json["status"], "available");
    }
}
