//! Generador de jobs de demostración
//!
//! Crea viajes (70%) y entregas (30%) aleatorios entre ubicaciones conocidas
//! de Portland mientras el número de jobs activos esté por debajo del límite.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::job::{DeliveryDetails, Job};
use crate::services::job_service::JobService;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub region: String,
    pub max_active_jobs: usize,
    pub ride_probability: f64,
    /// Espera cuando se alcanza el límite o falla la consulta
    pub pause_interval: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            region: "us-west-2".to_string(),
            max_active_jobs: 25,
            ride_probability: 0.7,
            pause_interval: Duration::from_secs(15),
            min_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Ubicación con nombre
#[derive(Debug, Clone, Copy)]
pub struct NamedLocation {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

const fn loc(name: &'static str, lat: f64, lng: f64) -> NamedLocation {
    NamedLocation { name, lat, lng }
}

pub const PORTLAND_LOCATIONS: &[NamedLocation] = &[
    loc("Pioneer Courthouse Square", 45.5188, -122.6793),
    loc("Powell's City of Books", 45.5230, -122.6814),
    loc("Union Station", 45.5289, -122.6765),
    loc("Director Park", 45.5181, -122.6850),
    loc("Tom McCall Waterfront Park", 45.5152, -122.6647),
    loc("Oregon Convention Center", 45.5289, -122.6633),
    loc("Moda Center", 45.5316, -122.6668),
    loc("Pioneer Place Mall", 45.5188, -122.6746),
    loc("Pearl District Whole Foods", 45.5266, -122.6908),
    loc("Jamison Square", 45.5263, -122.6919),
    loc("Fields Park", 45.5298, -122.6944),
    loc("Hawthorne Bridge East End", 45.5122, -122.6687),
    loc("Laurelhurst Park", 45.5162, -122.6295),
    loc("Mount Tabor Summit", 45.5118, -122.5933),
    loc("Sellwood Bridge", 45.4632, -122.6681),
    loc("OHSU Waterfront Campus", 45.4983, -122.6739),
    loc("Tilikum Crossing", 45.5017, -122.6656),
    loc("Hawthorne District", 45.5122, -122.6208),
    loc("Division District", 45.5048, -122.6540),
    loc("Reed College", 45.4823, -122.6319),
    loc("Lloyd Center Mall", 45.5311, -122.6536),
    loc("Alberta Arts District", 45.5581, -122.6656),
    loc("Mississippi District", 45.5459, -122.6759),
    loc("Irvington District", 45.5459, -122.6536),
    loc("OHSU Main Campus", 45.4993, -122.6859),
    loc("Portland State University", 45.5118, -122.6839),
    loc("Johns Landing", 45.4764, -122.6739),
    loc("Gabriel Park", 45.4511, -122.6908),
    loc("Forest Park Entrance", 45.5701, -122.7603),
    loc("NW 23rd Avenue", 45.5298, -122.6979),
    loc("Wallace Park", 45.5298, -122.7025),
    loc("St. Johns Bridge", 45.5816, -122.7603),
    loc("Kenton District", 45.5816, -122.6908),
    loc("Overlook Park", 45.5459, -122.6908),
    loc("Oregon Zoo", 45.5099, -122.7161),
    loc("International Rose Garden", 45.5188, -122.7161),
    loc("Pittock Mansion", 45.5230, -122.7161),
    loc("PDX Departures", 45.5898, -122.5951),
    loc("PDX Arrivals", 45.5881, -122.5975),
    loc("Jantzen Beach", 45.6062, -122.6908),
    loc("IKEA Portland", 45.5533, -122.6789),
    loc("Washington Square", 45.4511, -122.7603),
    loc("Clackamas Town Center", 45.4511, -122.5633),
    loc("Hollywood District", 45.5311, -122.6208),
    loc("Legacy Emanuel Hospital", 45.5459, -122.6656),
    loc("Providence Portland", 45.5230, -122.6319),
    loc("University of Portland", 45.5701, -122.7161),
    loc("Lewis & Clark College", 45.4511, -122.6681),
];

pub const DEMO_CUSTOMERS: &[&str] = &[
    "alex-chen", "sarah-johnson", "mike-rodriguez", "emma-davis", "james-wilson",
    "lisa-anderson", "david-brown", "maria-garcia", "chris-taylor", "jennifer-white",
    "robert-lee", "amanda-clark", "kevin-martinez", "business-traveler", "medical-patient",
    "airport-shuttle", "food-delivery", "package-express", "grocery-delivery", "pharmacy-run",
    "zoo-visitor", "concert-goer", "student-rider", "date-night", "work-commute",
];

pub struct DemoJobGenerator {
    jobs: Arc<JobService>,
    config: DemoConfig,
}

impl DemoJobGenerator {
    pub fn new(jobs: Arc<JobService>, config: DemoConfig) -> Self {
        Self { jobs, config }
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            max_jobs = self.config.max_active_jobs,
            region = %self.config.region,
            "🚀 Generador de jobs de demo iniciado"
        );

        loop {
            let delay = match self.jobs.active_job_count().await {
                Ok(active) if active >= self.config.max_active_jobs => {
                    tracing::info!(active, max_jobs = self.config.max_active_jobs, "⏸️ Límite de jobs activos alcanzado");
                    self.config.pause_interval
                }
                Ok(_) => {
                    if let Err(e) = self.create_random_job().await {
                        tracing::error!(error = %e, "❌ No se pudo crear el job de demo");
                    }
                    self.next_delay()
                }
                Err(e) => {
                    tracing::error!(error = %e, "❌ No se pudo contar los jobs activos");
                    self.config.pause_interval
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("🛑 Generador de jobs de demo detenido");
    }

    fn next_delay(&self) -> Duration {
        if self.config.max_delay <= self.config.min_delay {
            return self.config.min_delay;
        }
        rand::thread_rng().gen_range(self.config.min_delay..self.config.max_delay)
    }

    /// Crea un job aleatorio con origen y destino distintos
    pub async fn create_random_job(&self) -> AppResult<Job> {
        let (pickup, destination, customer, is_ride) = {
            let mut rng = rand::thread_rng();
            let mut picks = PORTLAND_LOCATIONS.choose_multiple(&mut rng, 2);
            let (pickup, destination) = match (picks.next(), picks.next()) {
                (Some(a), Some(b)) => (*a, *b),
                _ => return Err(AppError::Internal("not enough demo locations".to_string())),
            };
            let customer = DEMO_CUSTOMERS.choose(&mut rng).copied().unwrap_or("demo-customer");
            let is_ride = rng.gen_bool(self.config.ride_probability.clamp(0.0, 1.0));
            (pickup, destination, customer, is_ride)
        };

        let job = if is_ride {
            self.jobs
                .create_ride_job(
                    customer,
                    &self.config.region,
                    pickup.lat,
                    pickup.lng,
                    destination.lat,
                    destination.lng,
                )
                .await?
        } else {
            self.jobs
                .create_delivery_job(
                    customer,
                    &self.config.region,
                    pickup.lat,
                    pickup.lng,
                    destination.lat,
                    destination.lng,
                    DeliveryDetails {
                        restaurant_name: "Demo Restaurant".to_string(),
                        items: vec!["Demo Package".to_string()],
                        instructions: "Demo delivery - handle with care".to_string(),
                    },
                )
                .await?
        };

        tracing::info!(
            job_id = %job.id,
            job_type = %job.job_type,
            pickup = pickup.name,
            destination = destination.name,
            customer,
            "🎲 Job de demo creado"
        );
        Ok(job)
    }
}
