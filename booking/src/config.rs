//! Configuration management for the booking engine.
//!
//! Loads configuration from environment variables with sensible defaults:
//! 80% slot availability, 90% payment approval, a 5% lost-race chance, and
//! latencies of 500/700/1500 ms for catalog, slot, and booking calls.

use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Simulation tuning (probabilities and latencies)
    pub simulation: SimulationConfig,
    /// Booking policy
    pub booking: BookingConfig,
}

/// Simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Probability that an unbooked slot is offered as available
    pub availability_probability: f64,
    /// Probability that a payment authorization is approved
    pub payment_approval_probability: f64,
    /// Probability that a free slot is lost to a simulated concurrent booker
    pub race_loss_probability: f64,
    /// Probability that a catalog fetch fails outright
    pub catalog_failure_probability: f64,
    /// Simulated latency of catalog calls in milliseconds
    pub catalog_latency_ms: u64,
    /// Simulated latency of slot listing calls in milliseconds
    pub slots_latency_ms: u64,
    /// Simulated latency of booking calls in milliseconds
    pub booking_latency_ms: u64,
    /// Simulated latency of payment authorization in milliseconds
    pub payment_latency_ms: u64,
}

/// Booking policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Whether a booking without payment details is accepted
    pub allow_unpaid: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            availability_probability: 0.8,
            payment_approval_probability: 0.9,
            race_loss_probability: 0.05,
            catalog_failure_probability: 0.0,
            catalog_latency_ms: 500,
            slots_latency_ms: 700,
            booking_latency_ms: 1500,
            payment_latency_ms: 100,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { allow_unpaid: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            booking: BookingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = SimulationConfig::default();
        Self {
            simulation: SimulationConfig {
                availability_probability: env_parsed(
                    "CREASE_AVAILABILITY_PROBABILITY",
                    defaults.availability_probability,
                ),
                payment_approval_probability: env_parsed(
                    "CREASE_PAYMENT_APPROVAL_PROBABILITY",
                    defaults.payment_approval_probability,
                ),
                race_loss_probability: env_parsed(
                    "CREASE_RACE_LOSS_PROBABILITY",
                    defaults.race_loss_probability,
                ),
                catalog_failure_probability: env_parsed(
                    "CREASE_CATALOG_FAILURE_PROBABILITY",
                    defaults.catalog_failure_probability,
                ),
                catalog_latency_ms: env_parsed("CREASE_CATALOG_LATENCY_MS", defaults.catalog_latency_ms),
                slots_latency_ms: env_parsed("CREASE_SLOTS_LATENCY_MS", defaults.slots_latency_ms),
                booking_latency_ms: env_parsed("CREASE_BOOKING_LATENCY_MS", defaults.booking_latency_ms),
                payment_latency_ms: env_parsed("CREASE_PAYMENT_LATENCY_MS", defaults.payment_latency_ms),
            },
            booking: BookingConfig {
                allow_unpaid: env_parsed("CREASE_ALLOW_UNPAID", true),
            },
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
