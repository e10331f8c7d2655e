use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use fleet_dispatch::clients::{FleetClient, LocalFleetClient, LocalJobClient};
use fleet_dispatch::config::{PricingConfig, SimulationConfig};
use fleet_dispatch::models::{FleetEvent, JobStatus, VehicleStatus};
use fleet_dispatch::repositories::{InMemoryJobRepository, InMemoryVehicleRepository};
use fleet_dispatch::services::{ChannelEventSink, FleetService, JobService, NoopEventSink, RoutingService};
use fleet_dispatch::simulation::{FleetSimulator, SimulatedVehicle, SimulationContext, VehiclePhase};
use fleet_dispatch::utils::geo::GeoPoint;

struct Harness {
    fleet: FleetService,
    jobs: Arc<JobService>,
    context: SimulationContext,
}

fn harness() -> Harness {
    let fleet = FleetService::new(Arc::new(InMemoryVehicleRepository::new()));
    let fleet_client: Arc<dyn FleetClient> = Arc::new(LocalFleetClient::new(fleet.clone()));
    let jobs = Arc::new(JobService::new(
        Arc::new(InMemoryJobRepository::new()),
        fleet_client.clone(),
        Arc::new(NoopEventSink),
        PricingConfig::default(),
    ));
    let context = SimulationContext {
        fleet: fleet_client,
        jobs: Arc::new(LocalJobClient::new(jobs.clone())),
        routing: RoutingService::straight_line(),
        events: Arc::new(NoopEventSink),
        config: SimulationConfig::default(),
    };
    Harness { fleet, jobs, context }
}

#[tokio::test]
async fn test_drain_is_fractional_and_clamped() {
    let h = harness();
    let mut vehicle = SimulatedVehicle::new("sim-vehicle-1", "us-west-2", GeoPoint::new(45.5188, -122.6793), 80.0, h.context);

    vehicle.drain_battery(0.001);
    assert!((80.0 - vehicle.battery() - 0.00025).abs() < 1e-12);

    vehicle.drain_battery(1_000.0);
    assert_eq!(vehicle.battery(), 0.0);
    assert_eq!(vehicle.status(), VehicleStatus::Maintenance);
    assert_eq!(vehicle.phase(), VehiclePhase::Stranded);
}

#[tokio::test]
async fn test_stranded_vehicle_recovers_through_charging() {
    let h = harness();
    let mut vehicle = SimulatedVehicle::new("sim-vehicle-1", "us-west-2", GeoPoint::new(45.5188, -122.6793), 1.0, h.context);
    h.fleet.register_vehicle(vehicle.to_vehicle()).await.unwrap();

    vehicle.drain_battery(100.0);
    assert_eq!(vehicle.status(), VehicleStatus::Maintenance);

    // asistencia → camino a la estación → carga → disponible
    let mut became_available = false;
    for _ in 0..200 {
        vehicle.tick().await;
        if vehicle.status() == VehicleStatus::Available {
            became_available = true;
            break;
        }
    }

    assert!(became_available);
    assert!(vehicle.battery() >= 95.0);
    let stored = h.fleet.get_vehicle("sim-vehicle-1").await.unwrap();
    assert_eq!(stored.status, VehicleStatus::Available);
}

#[tokio::test]
async fn test_vehicle_reports_telemetry_each_tick() {
    let h = harness();
    let (sink, mut events) = ChannelEventSink::new(8);
    let context = SimulationContext {
        events: Arc::new(sink),
        ..h.context.clone()
    };
    let mut vehicle = SimulatedVehicle::new("sim-vehicle-1", "us-west-2", GeoPoint::new(45.5188, -122.6793), 80.0, context);
    h.fleet.register_vehicle(vehicle.to_vehicle()).await.unwrap();

    vehicle.tick().await;
    vehicle.tick().await;

    let mut telemetry = 0;
    while let Ok(event) = events.try_recv() {
        if let FleetEvent::VehicleTelemetry(t) = event {
            assert_eq!(t.vehicle_id, "sim-vehicle-1");
            telemetry += 1;
        }
    }
    assert_eq!(telemetry, 2);
}

#[tokio::test(start_paused = true)]
async fn test_simulated_fleet_completes_a_ride() {
    let h = harness();
    let (tx, rx) = watch::channel(false);
    let simulator = FleetSimulator::new(h.context.clone(), "us-west-2", 2, GeoPoint::new(45.5188, -122.6793));
    let handle = simulator.spawn(rx);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(h.fleet.list_vehicles().await.unwrap().len(), 2);

    let job = h
        .jobs
        .create_ride_job("c1", "us-west-2", 45.5230, -122.6814, 45.5289, -122.6765)
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Assigned);

    let mut status = job.status;
    for _ in 0..720 {
        tokio::time::sleep(Duration::from_secs(10)).await;
        status = h.jobs.get_job(&job.id).await.unwrap().status;
        if status == JobStatus::Completed {
            break;
        }
    }
    assert_eq!(status, JobStatus::Completed);

    tx.send(true).unwrap();
    handle.await.unwrap();
}
