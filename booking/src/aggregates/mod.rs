//! Aggregates for the booking engine.
//!
//! The reservation aggregate is the only writer in the system: the ground
//! catalog is immutable and slot listings are read-only queries over the
//! ledger it maintains.

pub mod reservation;

pub use reservation::{
    PaymentOutcome, RejectionReason, ReservationAction, ReservationEnvironment,
    ReservationReducer,
};
