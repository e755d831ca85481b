//! Error taxonomy for the booking engine.
//!
//! Every failure mode is a distinct variant so callers can tell a declined
//! payment from a slot conflict. Nothing is retried automatically; the
//! caller decides whether to re-query availability after a failure.

use crate::aggregates::reservation::RejectionReason;
use crate::types::GroundId;
use thiserror::Error;

/// Errors reported by the booking engine's public operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookingError {
    /// No ground exists with the requested identifier
    #[error("no ground with id `{0}`")]
    GroundNotFound(GroundId),

    /// The requested interval is not one of the bookable one-hour slots
    #[error("requested interval is not a bookable one-hour slot")]
    InvalidSlot,

    /// Payment details are required but were not supplied
    #[error("payment details are required")]
    PaymentRequired,

    /// The simulated payment authorization declined the card
    #[error("payment declined: {reason}")]
    PaymentDeclined {
        /// Decline reason
        reason: String,
    },

    /// The slot is already reserved, or was lost to a concurrent booking
    #[error("slot is already reserved")]
    SlotConflict,

    /// A simulated network or booking failure
    #[error("booking failed: {reason}")]
    TransientFailure {
        /// Failure description
        reason: String,
    },
}

impl From<RejectionReason> for BookingError {
    fn from(reason: RejectionReason) -> Self {
        match reason {
            RejectionReason::PaymentRequired => Self::PaymentRequired,
            RejectionReason::PaymentDeclined { reason } => Self::PaymentDeclined { reason },
            RejectionReason::SlotConflict => Self::SlotConflict,
            RejectionReason::Transient { reason } => Self::TransientFailure { reason },
        }
    }
}
