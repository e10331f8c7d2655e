//! Política de precios
//!
//! Función pura: viajes = tarifa base + km × tarifa por km; entregas = tarifa
//! plana sin componente de distancia.

use crate::config::PricingConfig;
use crate::models::job::{Fare, JobType};

pub fn compute_fare(config: &PricingConfig, job_type: JobType, distance_km: f64) -> Fare {
    match job_type {
        JobType::Ride => {
            let distance = distance_km * config.ride_per_km;
            Fare {
                base: config.ride_base_fare,
                distance,
                total: config.ride_base_fare + distance,
            }
        }
        JobType::Delivery => Fare {
            base: config.delivery_flat_fare,
            distance: 0.0,
            total: config.delivery_flat_fare,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ride_fare_for_five_km() {
        let fare = compute_fare(&PricingConfig::default(), JobType::Ride, 5.0);
        assert!((fare.base - 2.50).abs() < 1e-9);
        assert!((fare.distance - 9.00).abs() < 1e-9);
        assert!((fare.total - 11.50).abs() < 1e-9);
    }

    #[test]
    fn test_delivery_fare_is_flat() {
        let config = PricingConfig::default();
        for km in [0.0, 1.0, 12.5, 300.0] {
            let fare = compute_fare(&config, JobType::Delivery, km);
            assert_eq!(fare.total, 8.99);
            assert_eq!(fare.distance, 0.0);
        }
    }

    #[test]
    fn test_custom_rates() {
        let config = PricingConfig {
            ride_base_fare: 1.0,
            ride_per_km: 2.0,
            delivery_flat_fare: 5.0,
        };
        assert_eq!(compute_fare(&config, JobType::Ride, 3.0).total, 7.0);
    }
}
