//! Simulated payment gateway.
//!
//! A simplified payment authorization interface shaped like the real
//! processors it stands in for. No money moves: authorization is a random
//! draw against the configured approval probability after a simulated
//! network delay.

use crate::simulation::SimulationPolicy;
use crate::types::{Money, PaymentCard};
use crease_kings_core::environment::RandomSource;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Payment gateway result
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Payment gateway error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The card was declined
    #[error("card declined: {reason}")]
    Declined {
        /// Decline reason
        reason: String,
    },

    /// The gateway could not be reached
    #[error("payment gateway unavailable")]
    Unavailable,
}

/// A granted payment authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAuthorization {
    /// Gateway authorization reference
    pub authorization_id: String,
    /// Amount authorized
    pub amount: Money,
    /// Last four digits of the card charged
    pub card_last_four: String,
}

/// Payment gateway trait
///
/// Abstraction over payment processors so tests can swap in a pinned
/// outcome and the booking reducer never touches randomness for payment
/// directly.
pub trait PaymentGateway: Send + Sync {
    /// Authorize a payment
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Declined`] when the issuer declines the card
    /// and [`GatewayError::Unavailable`] when the gateway cannot be reached.
    fn authorize(
        &self,
        card: &PaymentCard,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentAuthorization>> + Send>>;
}

/// Simulated payment gateway
///
/// Approves with the policy's approval probability after the policy's
/// payment latency. Cards whose number is too short to carry four digits
/// are declined outright.
#[derive(Clone)]
pub struct SimulatedPaymentGateway {
    approval_probability: f64,
    latency: Duration,
    random: Arc<dyn RandomSource>,
}

impl SimulatedPaymentGateway {
    /// Creates a gateway from the simulation policy
    #[must_use]
    pub fn new(policy: &SimulationPolicy, random: Arc<dyn RandomSource>) -> Self {
        Self {
            approval_probability: policy.payment_approval_probability,
            latency: policy.payment_latency,
            random,
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(policy: &SimulationPolicy, random: Arc<dyn RandomSource>) -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new(policy, random))
    }
}

impl PaymentGateway for SimulatedPaymentGateway {
    fn authorize(
        &self,
        card: &PaymentCard,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentAuthorization>> + Send>> {
        let approval_probability = self.approval_probability;
        let latency = self.latency;
        let random = Arc::clone(&self.random);
        let last_four = card.last_four().to_string();
        let well_formed = card.card_number.len() >= 4;

        Box::pin(async move {
            // Simulate network delay
            tokio::time::sleep(latency).await;

            if !well_formed {
                tracing::warn!("payment rejected: unrecognized card number");
                return Err(GatewayError::Declined {
                    reason: "unrecognized card number".to_string(),
                });
            }

            if random.chance(approval_probability) {
                let authorization_id = format!("sim_auth_{}", uuid::Uuid::new_v4());
                tracing::info!(
                    card_last_four = %last_four,
                    amount_paise = amount.paise(),
                    authorization_id = %authorization_id,
                    "payment authorized"
                );
                Ok(PaymentAuthorization {
                    authorization_id,
                    amount,
                    card_last_four: last_four,
                })
            } else {
                tracing::warn!(card_last_four = %last_four, "payment declined");
                Err(GatewayError::Declined {
                    reason: "card declined by issuer".to_string(),
                })
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crease_kings_core::environment::SeededRandom;

    fn card() -> PaymentCard {
        PaymentCard {
            card_number: "4242424242424242".to_string(),
            expiry_date: "12/27".to_string(),
            cvc: "123".to_string(),
        }
    }

    fn gateway(approval_probability: f64) -> SimulatedPaymentGateway {
        let policy = SimulationPolicy {
            payment_approval_probability: approval_probability,
            ..SimulationPolicy::certain()
        };
        SimulatedPaymentGateway::new(&policy, Arc::new(SeededRandom::new(11)))
    }

    #[tokio::test]
    async fn certain_approval_authorizes_the_card() {
        let result = gateway(1.0).authorize(&card(), Money::from_rupees(1200)).await;

        let auth = result.unwrap();
        assert_eq!(auth.amount, Money::from_rupees(1200));
        assert_eq!(auth.card_last_four, "4242");
        assert!(auth.authorization_id.starts_with("sim_auth_"));
    }

    #[tokio::test]
    async fn zero_approval_always_declines() {
        let result = gateway(0.0).authorize(&card(), Money::from_rupees(1200)).await;

        assert_eq!(
            result,
            Err(GatewayError::Declined {
                reason: "card declined by issuer".to_string()
            })
        );
    }

    #[tokio::test]
    async fn short_card_numbers_are_rejected() {
        let stub = PaymentCard {
            card_number: "42".to_string(),
            expiry_date: "12/27".to_string(),
            cvc: "123".to_string(),
        };
        let result = gateway(1.0).authorize(&stub, Money::from_rupees(100)).await;

        assert_eq!(
            result,
            Err(GatewayError::Declined {
                reason: "unrecognized card number".to_string()
            })
        );
    }
}
