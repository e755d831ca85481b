//! Injectable simulation policy.
//!
//! All probabilistic and latency behaviour of the engine is collected here
//! so tests can swap the demo defaults for deterministic values without
//! touching domain code.

use crate::config::SimulationConfig;
use crease_kings_core::environment::clamp_probability;
use std::time::Duration;

/// Probabilities and latencies driving the simulated backend
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationPolicy {
    /// Probability that an unbooked slot is offered as available
    pub availability_probability: f64,
    /// Probability that a payment authorization is approved
    pub payment_approval_probability: f64,
    /// Probability that a free slot is lost to a simulated concurrent booker
    pub race_loss_probability: f64,
    /// Probability that a catalog fetch fails outright
    pub catalog_failure_probability: f64,
    /// Simulated latency of catalog calls
    pub catalog_latency: Duration,
    /// Simulated latency of slot listing calls
    pub slots_latency: Duration,
    /// Simulated latency of booking calls
    pub booking_latency: Duration,
    /// Simulated latency of payment authorization
    pub payment_latency: Duration,
}

impl SimulationPolicy {
    /// Builds a policy from configuration, clamping probabilities to `[0, 1]`
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            availability_probability: clamp_probability(config.availability_probability),
            payment_approval_probability: clamp_probability(config.payment_approval_probability),
            race_loss_probability: clamp_probability(config.race_loss_probability),
            catalog_failure_probability: clamp_probability(config.catalog_failure_probability),
            catalog_latency: Duration::from_millis(config.catalog_latency_ms),
            slots_latency: Duration::from_millis(config.slots_latency_ms),
            booking_latency: Duration::from_millis(config.booking_latency_ms),
            payment_latency: Duration::from_millis(config.payment_latency_ms),
        }
    }

    /// A fully deterministic policy: every slot available, every payment
    /// approved, no simulated races or failures, zero latency
    #[must_use]
    pub const fn certain() -> Self {
        Self {
            availability_probability: 1.0,
            payment_approval_probability: 1.0,
            race_loss_probability: 0.0,
            catalog_failure_probability: 0.0,
            catalog_latency: Duration::ZERO,
            slots_latency: Duration::ZERO,
            booking_latency: Duration::ZERO,
            payment_latency: Duration::ZERO,
        }
    }
}

impl Default for SimulationPolicy {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_clamps_probabilities() {
        let config = SimulationConfig {
            availability_probability: 1.7,
            payment_approval_probability: -0.3,
            ..SimulationConfig::default()
        };
        let policy = SimulationPolicy::from_config(&config);
        assert!((policy.availability_probability - 1.0).abs() < f64::EPSILON);
        assert!(policy.payment_approval_probability.abs() < f64::EPSILON);
    }

    #[test]
    fn certain_policy_has_no_latency_or_failures() {
        let policy = SimulationPolicy::certain();
        assert_eq!(policy.booking_latency, Duration::ZERO);
        assert!((policy.race_loss_probability).abs() < f64::EPSILON);
        assert!((policy.availability_probability - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_policy_matches_config_defaults() {
        let policy = SimulationPolicy::default();
        assert_eq!(policy.catalog_latency, Duration::from_millis(500));
        assert_eq!(policy.slots_latency, Duration::from_millis(700));
        assert_eq!(policy.booking_latency, Duration::from_millis(1500));
    }
}
