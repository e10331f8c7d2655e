//! Parámetros de la simulación de vehículos
//!
//! Umbrales de batería, velocidad, tick y política de reintentos del
//! registro. Los valores por defecto reproducen el comportamiento de la demo.

use std::time::Duration;

use rand::Rng;

use crate::models::vehicle::DEFAULT_DRAIN_RATE_KM_PER_PERCENT;

/// Paso por tick en grados (~ conducción urbana)
pub const DEFAULT_STEP_SIZE_DEG: f64 = 0.00035;

/// Distancia en grados por debajo de la cual se considera que se llegó (~100 m)
pub const ARRIVAL_THRESHOLD_DEG: f64 = 0.001;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub tick_interval: Duration,
    pub step_size_deg: f64,
    pub arrival_threshold_deg: f64,
    /// Probabilidad por tick de empezar a deambular cuando está libre
    pub idle_move_probability: f64,
    pub wander_radius_deg: f64,
    /// Umbral proactivo: libre y por debajo → ir a cargar
    pub low_battery_threshold: f64,
    /// Umbral de emergencia: ocupado y por debajo → abandonar el job
    pub critical_battery_threshold: f64,
    pub charge_per_tick: f64,
    pub charge_target: f64,
    pub roadside_battery_level: f64,
    pub towed_battery_level: f64,
    pub min_initial_battery: f64,
    pub max_initial_battery: f64,
    pub drain_rate_km_per_percent: f64,
    /// Separación entre arranques de vehículos
    pub start_stagger: Duration,
    pub registration: RetryPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(2),
            step_size_deg: DEFAULT_STEP_SIZE_DEG,
            arrival_threshold_deg: ARRIVAL_THRESHOLD_DEG,
            idle_move_probability: 0.1,
            wander_radius_deg: 0.01,
            low_battery_threshold: 30.0,
            critical_battery_threshold: 15.0,
            charge_per_tick: 2.0,
            charge_target: 95.0,
            roadside_battery_level: 20.0,
            towed_battery_level: 5.0,
            min_initial_battery: 60.0,
            max_initial_battery: 100.0,
            drain_rate_km_per_percent: DEFAULT_DRAIN_RATE_KM_PER_PERCENT,
            start_stagger: Duration::from_millis(100),
            registration: RetryPolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Aplicar `SIM_TICK_MS` y `DEMO_SPEED` sobre los valores por defecto
    pub fn from_environment(env: &super::EnvironmentConfig) -> Self {
        let mut config = Self::default();
        config.tick_interval = env.sim_tick;
        if let Some(speed) = env.demo_speed.filter(|s| *s > 0.0) {
            config.step_size_deg = speed;
        }
        config
    }

    pub fn random_initial_battery(&self) -> f64 {
        if self.max_initial_battery <= self.min_initial_battery {
            return self.min_initial_battery;
        }
        rand::thread_rng().gen_range(self.min_initial_battery..self.max_initial_battery)
    }
}

/// Backoff exponencial con tope y jitter para el registro en la flota
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    pub overall_timeout: Duration,
    /// Fracción máxima de retardo extra aleatorio (0.1 = hasta +10%)
    pub jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
            multiplier: 1.5,
            max_delay: Duration::from_secs(30),
            overall_timeout: Duration::from_secs(300),
            jitter_ratio: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Retardo sin jitter tras el intento `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }

    /// Retardo con jitter, nunca por encima de `max_delay`
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let delay = self.delay_for_attempt(attempt);
        if self.jitter_ratio <= 0.0 {
            return delay;
        }
        let extra = rand::thread_rng().gen_range(0.0..=self.jitter_ratio);
        let jittered = delay.as_secs_f64() * (1.0 + extra);
        Duration::from_secs_f64(jittered.min(self.max_delay.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(1500));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(2250));
        assert_eq!(policy.delay_for_attempt(20), Duration::from_secs(30));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let policy = RetryPolicy::default();
        for attempt in 1..=12 {
            let base = policy.delay_for_attempt(attempt);
            let jittered = policy.jittered_delay(attempt);
            assert!(jittered >= base);
            assert!(jittered <= policy.max_delay);
            assert!(jittered.as_secs_f64() <= base.as_secs_f64() * 1.1 + 1e-9);
        }
    }

    #[test]
    fn test_initial_battery_range() {
        let config = SimulationConfig::default();
        for _ in 0..100 {
            let level = config.random_initial_battery();
            assert!((60.0..100.0).contains(&level));
        }
    }
}
