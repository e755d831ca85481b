//! Reservation aggregate for the booking engine.
//!
//! Implements the check-then-commit reservation flow:
//!
//! 1. `RequestReservation` picks the payment path and starts the simulated
//!    booking latency (and, with a card, the payment authorization).
//! 2. The effect feeds back `FinalizeReservation` carrying the payment
//!    outcome.
//! 3. Finalization runs the ledger conflict check, the lost-race draw, and
//!    the commit inside a single reducer invocation. The store executes
//!    reducers under the state write lock, so the sequence is atomic:
//!    concurrent requests for the same slot serialize and exactly one can
//!    commit.
//! 4. The terminal event (`SlotReserved` or `ReservationRejected`) is fed
//!    back through an effect so request-response waiters observe it on the
//!    store's action broadcast, strictly after the commit.
//!
//! A committed reservation is terminal for the process lifetime; there is
//! no cancellation path.

use crate::payment_gateway::{GatewayError, PaymentGateway};
use crate::simulation::SimulationPolicy;
use crate::types::{
    GroundId, LedgerKey, LedgerState, Money, PaymentCard, ReservationId, ReservationRecord,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use crease_kings_core::environment::{Clock, RandomSource};
use crease_kings_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for the reservation aggregate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ReservationAction {
    // Commands
    /// Request a new reservation
    RequestReservation {
        /// Reservation ID assigned to this attempt
        reservation_id: ReservationId,
        /// Ground to book
        ground: GroundId,
        /// Booking date
        date: NaiveDate,
        /// Slot start time
        start_time: NaiveTime,
        /// Slot end time
        end_time: NaiveTime,
        /// Amount to charge
        amount: Money,
        /// Payment card details, if supplied
        payment: Option<PaymentCard>,
    },

    // Effect feedback
    /// Complete a reservation attempt once payment has settled
    FinalizeReservation {
        /// Reservation ID
        reservation_id: ReservationId,
        /// Ground to book
        ground: GroundId,
        /// Booking date
        date: NaiveDate,
        /// Slot start time
        start_time: NaiveTime,
        /// Slot end time
        end_time: NaiveTime,
        /// Amount to charge
        amount: Money,
        /// How the payment step ended
        payment: PaymentOutcome,
    },

    // Events
    /// A slot was committed to the ledger
    SlotReserved {
        /// Reservation ID
        reservation_id: ReservationId,
        /// Ground booked
        ground: GroundId,
        /// Booking date
        date: NaiveDate,
        /// Slot start time
        start_time: NaiveTime,
        /// Slot end time
        end_time: NaiveTime,
        /// Amount charged
        amount: Money,
        /// When the reservation was committed
        reserved_at: DateTime<Utc>,
    },

    /// A reservation attempt was rejected
    ReservationRejected {
        /// Reservation ID
        reservation_id: ReservationId,
        /// Why the attempt failed
        reason: RejectionReason,
    },
}

/// Outcome of the payment step of a reservation attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    /// The gateway authorized the card
    Authorized {
        /// Gateway authorization reference
        authorization_id: String,
    },
    /// No card was supplied and unpaid bookings are accepted
    Waived,
    /// The gateway declined the card
    Declined {
        /// Decline reason
        reason: String,
    },
    /// The gateway could not be reached
    Errored {
        /// Failure description
        reason: String,
    },
}

/// Why a reservation attempt was rejected
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Payment details are required but were not supplied
    PaymentRequired,
    /// The simulated payment authorization declined the card
    PaymentDeclined {
        /// Decline reason
        reason: String,
    },
    /// The slot is already reserved, or was lost to a concurrent booking
    SlotConflict,
    /// A simulated network or booking failure
    Transient {
        /// Failure description
        reason: String,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PaymentRequired => write!(f, "payment details are required"),
            Self::PaymentDeclined { reason } => write!(f, "payment declined: {reason}"),
            Self::SlotConflict => write!(f, "slot is already reserved"),
            Self::Transient { reason } => write!(f, "booking failed: {reason}"),
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the reservation aggregate
#[derive(Clone)]
pub struct ReservationEnvironment {
    /// Clock for commit timestamps
    pub clock: Arc<dyn Clock>,
    /// Randomness for the lost-race draw
    pub random: Arc<dyn RandomSource>,
    /// Payment authorization
    pub gateway: Arc<dyn PaymentGateway>,
    /// Simulation probabilities and latencies
    pub policy: SimulationPolicy,
    /// Whether a booking without payment details is accepted
    pub allow_unpaid: bool,
}

impl ReservationEnvironment {
    /// Creates a new `ReservationEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        gateway: Arc<dyn PaymentGateway>,
        policy: SimulationPolicy,
        allow_unpaid: bool,
    ) -> Self {
        Self {
            clock,
            random,
            gateway,
            policy,
            allow_unpaid,
        }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the reservation aggregate
#[derive(Clone, Debug)]
pub struct ReservationReducer;

impl ReservationReducer {
    /// Creates a new `ReservationReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies an event to state
    ///
    /// Idempotent: replaying `SlotReserved` keeps the first record.
    fn apply_event(state: &mut LedgerState, action: &ReservationAction) {
        match action {
            ReservationAction::SlotReserved {
                reservation_id,
                ground,
                date,
                start_time,
                reserved_at,
                ..
            } => {
                state.record(
                    LedgerKey::new(ground.clone(), *date),
                    ReservationRecord {
                        reservation_id: *reservation_id,
                        start_time: *start_time,
                        reserved_at: *reserved_at,
                    },
                );
                state.last_error = None;
            }

            ReservationAction::ReservationRejected { reason, .. } => {
                state.last_error = Some(reason.to_string());
            }

            // Commands and effect feedback don't modify state directly
            ReservationAction::RequestReservation { .. }
            | ReservationAction::FinalizeReservation { .. } => {}
        }
    }

    /// Feed an event back through the store so waiters observe it
    fn emit(event: ReservationAction) -> Effect<ReservationAction> {
        Effect::future(async move { Some(event) })
    }

    fn reject(
        state: &mut LedgerState,
        reservation_id: ReservationId,
        reason: RejectionReason,
    ) -> SmallVec<[Effect<ReservationAction>; 4]> {
        let event = ReservationAction::ReservationRejected {
            reservation_id,
            reason,
        };
        Self::apply_event(state, &event);
        smallvec![Self::emit(event)]
    }
}

impl Default for ReservationReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for ReservationReducer {
    type State = LedgerState;
    type Action = ReservationAction;
    type Environment = ReservationEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Step 1: Request (payment path) ==========
            ReservationAction::RequestReservation {
                reservation_id,
                ground,
                date,
                start_time,
                end_time,
                amount,
                payment,
            } => {
                let latency = env.policy.booking_latency;

                match payment {
                    Some(card) => {
                        tracing::info!(
                            %reservation_id,
                            %ground,
                            %date,
                            %start_time,
                            "reservation requested"
                        );
                        let gateway = Arc::clone(&env.gateway);
                        smallvec![Effect::future(async move {
                            tokio::time::sleep(latency).await;
                            let payment = match gateway.authorize(&card, amount).await {
                                Ok(authorization) => PaymentOutcome::Authorized {
                                    authorization_id: authorization.authorization_id,
                                },
                                Err(GatewayError::Declined { reason }) => {
                                    PaymentOutcome::Declined { reason }
                                }
                                Err(error @ GatewayError::Unavailable) => {
                                    PaymentOutcome::Errored {
                                        reason: error.to_string(),
                                    }
                                }
                            };
                            Some(ReservationAction::FinalizeReservation {
                                reservation_id,
                                ground,
                                date,
                                start_time,
                                end_time,
                                amount,
                                payment,
                            })
                        })]
                    }

                    None if env.allow_unpaid => {
                        tracing::warn!(
                            %reservation_id,
                            %ground,
                            "reservation requested without payment details"
                        );
                        smallvec![Effect::future(async move {
                            tokio::time::sleep(latency).await;
                            Some(ReservationAction::FinalizeReservation {
                                reservation_id,
                                ground,
                                date,
                                start_time,
                                end_time,
                                amount,
                                payment: PaymentOutcome::Waived,
                            })
                        })]
                    }

                    None => {
                        tracing::warn!(
                            %reservation_id,
                            %ground,
                            "rejecting reservation without payment details"
                        );
                        smallvec![Effect::future(async move {
                            tokio::time::sleep(latency).await;
                            Some(ReservationAction::ReservationRejected {
                                reservation_id,
                                reason: RejectionReason::PaymentRequired,
                            })
                        })]
                    }
                }
            }

            // ========== Step 2: Finalize (check-then-commit) ==========
            ReservationAction::FinalizeReservation {
                reservation_id,
                ground,
                date,
                start_time,
                end_time,
                amount,
                payment,
            } => match payment {
                PaymentOutcome::Declined { reason } => {
                    tracing::warn!(%reservation_id, %reason, "payment declined");
                    Self::reject(
                        state,
                        reservation_id,
                        RejectionReason::PaymentDeclined { reason },
                    )
                }

                PaymentOutcome::Errored { reason } => {
                    tracing::error!(%reservation_id, %reason, "payment step failed");
                    Self::reject(state, reservation_id, RejectionReason::Transient { reason })
                }

                PaymentOutcome::Authorized { .. } | PaymentOutcome::Waived => {
                    let key = LedgerKey::new(ground.clone(), date);

                    if state.is_reserved(&key, start_time) {
                        tracing::warn!(
                            %reservation_id,
                            %ground,
                            %date,
                            %start_time,
                            "slot is already reserved"
                        );
                        return Self::reject(state, reservation_id, RejectionReason::SlotConflict);
                    }

                    // Simulated concurrent booker winning between the
                    // availability check and the commit.
                    if env.random.chance(env.policy.race_loss_probability) {
                        tracing::warn!(
                            %reservation_id,
                            %ground,
                            %start_time,
                            "slot lost to a concurrent booking"
                        );
                        return Self::reject(state, reservation_id, RejectionReason::SlotConflict);
                    }

                    let event = ReservationAction::SlotReserved {
                        reservation_id,
                        ground,
                        date,
                        start_time,
                        end_time,
                        amount,
                        reserved_at: env.clock.now(),
                    };
                    Self::apply_event(state, &event);
                    tracing::info!(%reservation_id, "slot reserved");
                    smallvec![Self::emit(event)]
                }
            },

            // ========== Events fed back from effects ==========
            event @ (ReservationAction::SlotReserved { .. }
            | ReservationAction::ReservationRejected { .. }) => {
                Self::apply_event(state, &event);
                SmallVec::new()
            }
        }
    }
}
