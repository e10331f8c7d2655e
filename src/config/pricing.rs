//! Constantes de tarifas

/// Tarifas configurables por tipo de job
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    pub ride_base_fare: f64,
    pub ride_per_km: f64,
    pub delivery_flat_fare: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            ride_base_fare: 2.50,
            ride_per_km: 1.80,
            delivery_flat_fare: 8.99,
        }
    }
}
