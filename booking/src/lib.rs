//! Crease Kings - a sports-ground booking engine
//!
//! The booking core of the Crease Kings application: a catalog of bookable
//! venues, per-day availability generation, and an in-memory reservation
//! ledger with a simulated payment step. All data is in memory and every
//! external interaction (network latency, payment processing, races with
//! concurrent bookers) is simulated through an injectable policy.
//!
//! # Architecture
//!
//! ```text
//!                 ┌─────────────────────────────┐
//!                 │         BookingApp          │
//!                 │  list_grounds / ground /    │
//!                 │  list_time_slots /          │
//!                 │  reserve_slot               │
//!                 └──────┬───────────────┬──────┘
//!                 reads  │               │ actions
//!                        ▼               ▼
//!        ┌────────────────────┐   ┌──────────────────────┐
//!        │   GroundCatalog    │   │  Store<LedgerState>  │
//!        │    (immutable)     │   │ ReservationReducer   │
//!        └────────────────────┘   └──────────┬───────────┘
//!                                            │ effects
//!                                            ▼
//!                                 ┌──────────────────────┐
//!                                 │   PaymentGateway     │
//!                                 │    (simulated)       │
//!                                 └──────────────────────┘
//! ```
//!
//! # Key Properties
//!
//! - **No double-booking**: the conflict check and the ledger commit run in
//!   one reducer invocation under the store's write lock, so concurrent
//!   attempts on the same slot serialize and exactly one wins.
//! - **Reserved means unavailable**: a start time in the ledger is reported
//!   unavailable by every later slot listing for that ground-day.
//! - **Deterministic when you need it**: probabilities, latencies, clock,
//!   and randomness are all injected, so tests run with pinned outcomes and
//!   zero delays.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregates;
pub mod app;
pub mod availability;
pub mod catalog;
pub mod config;
pub mod error;
pub mod payment_gateway;
pub mod simulation;
pub mod types;

pub use aggregates::{ReservationAction, ReservationEnvironment, ReservationReducer};
pub use app::{BookingApp, BookingAppBuilder};
pub use catalog::GroundCatalog;
pub use config::Config;
pub use error::BookingError;
pub use simulation::SimulationPolicy;
pub use types::*;
