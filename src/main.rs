use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use futures::future::join_all;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fleet_dispatch::clients::{
    FleetClient, HttpFleetClient, HttpJobClient, JobClient, LocalFleetClient, LocalJobClient, DEFAULT_HTTP_TIMEOUT,
};
use fleet_dispatch::config::{EnvironmentConfig, PricingConfig, SimulationConfig};
use fleet_dispatch::repositories::{InMemoryJobRepository, InMemoryVehicleRepository};
use fleet_dispatch::routes::create_app_router;
use fleet_dispatch::services::demo_service::{DemoConfig, DemoJobGenerator};
use fleet_dispatch::services::{
    EventSink, FleetService, JobProcessor, JobService, OsrmRouteProvider, RoutingService, TracingEventSink,
};
use fleet_dispatch::simulation::{FleetSimulator, SimulationContext};
use fleet_dispatch::state::AppState;
use fleet_dispatch::utils::geo::GeoPoint;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG, por defecto info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = EnvironmentConfig::default();

    info!("🚕 Fleet Dispatch - flota autónoma");
    info!("================================================");
    info!(
        mode = config.service_mode.as_str(),
        environment = %config.environment,
        region = %config.region,
        "⚙️ Configuración cargada"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let events: Arc<dyn EventSink> = Arc::new(TracingEventSink);
    let mut tasks = Vec::new();

    // Directorio de flota: local o remoto según el modo
    let fleet = config
        .runs_fleet()
        .then(|| FleetService::new(Arc::new(InMemoryVehicleRepository::new())));
    let fleet_client: Arc<dyn FleetClient> = match &fleet {
        Some(fleet) => Arc::new(LocalFleetClient::new(fleet.clone())),
        None => Arc::new(HttpFleetClient::new(&config.fleet_service_url, DEFAULT_HTTP_TIMEOUT)?),
    };

    // Ledger y orquestador de jobs
    let jobs = config.runs_jobs().then(|| {
        Arc::new(JobService::new(
            Arc::new(InMemoryJobRepository::new()),
            fleet_client.clone(),
            events.clone(),
            PricingConfig::default(),
        ))
    });

    if let Some(jobs) = &jobs {
        tasks.push(JobProcessor::new(jobs.clone(), config.processor_interval).spawn(shutdown_rx.clone()));

        if config.demo_mode {
            let demo = DemoConfig {
                region: config.region.clone(),
                pause_interval: config.demo_interval,
                ..DemoConfig::default()
            };
            tasks.push(DemoJobGenerator::new(jobs.clone(), demo).spawn(shutdown_rx.clone()));
        }
    }

    if config.runs_simulator() {
        let job_client: Arc<dyn JobClient> = match &jobs {
            Some(jobs) => Arc::new(LocalJobClient::new(jobs.clone())),
            None => Arc::new(HttpJobClient::new(&config.job_service_url, DEFAULT_HTTP_TIMEOUT)?),
        };
        let routing = match &config.osrm_url {
            Some(url) => {
                info!(osrm_url = %url, "🗺️ Proveedor de rutas OSRM configurado");
                RoutingService::with_provider(Arc::new(OsrmRouteProvider::new(url, config.routing_timeout)?))
            }
            None => RoutingService::straight_line(),
        };

        let context = SimulationContext {
            fleet: fleet_client.clone(),
            jobs: job_client,
            routing,
            events: events.clone(),
            config: SimulationConfig::from_environment(&config),
        };
        let simulator = FleetSimulator::new(
            context,
            config.region.clone(),
            config.vehicle_count,
            GeoPoint::new(config.start_lat, config.start_lng),
        );
        tasks.push(simulator.spawn(shutdown_rx.clone()));
    }

    if fleet.is_some() || jobs.is_some() {
        let addr: SocketAddr = config.server_url().parse()?;
        let app = create_app_router(AppState::new(config.clone(), fleet, jobs));

        info!("🌐 Servidor iniciando en http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("❌ Error del servidor: {}", e);
        }
    } else {
        info!("🚗 Solo simulador, esperando señal de apagado");
        shutdown_signal().await;
    }

    // Detener tareas en segundo plano
    let _ = shutdown_tx.send(true);
    for result in join_all(tasks).await {
        if let Err(e) = result {
            error!("❌ Tarea terminada con error: {}", e);
        }
    }

    info!("👋 Servicio terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando...");
        },
    }
}
