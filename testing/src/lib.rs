//! # Crease Kings Testing
//!
//! Testing utilities and helpers for the Crease Kings booking engine.
//!
//! This crate provides:
//! - A fluent Given-When-Then harness for reducer unit tests
//! - Assertion helpers for effects
//! - Deterministic environment helpers (fixed clock)
//!
//! ## Example
//!
//! ```ignore
//! use crease_kings_testing::ReducerTest;
//!
//! ReducerTest::new(ReservationReducer::new())
//!     .with_env(test_environment())
//!     .given_state(LedgerState::new())
//!     .when_action(ReservationAction::RequestReservation { .. })
//!     .then_state(|state| assert!(state.last_error.is_none()))
//!     .then_effects(|effects| assert_eq!(effects.len(), 1))
//!     .run();
//! ```

pub mod reducer_test;

/// Deterministic environment helpers
pub mod mocks {
    use chrono::{DateTime, Utc};
    use crease_kings_core::environment::FixedClock;

    /// Create a default fixed clock for tests (2024-07-10 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2024-07-10T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::test_clock;
pub use reducer_test::{ReducerTest, assertions};
