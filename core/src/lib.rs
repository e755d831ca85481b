//! # Crease Kings Core
//!
//! Core traits and types for the Crease Kings booking engine.
//!
//! This crate provides the fundamental abstractions for building the booking
//! domain as a small, testable state machine: state lives in a store,
//! business logic lives in pure reducers, and everything non-deterministic
//! (time, randomness, external gateways) is injected through an environment.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature (e.g. the reservation ledger)
//! - **Action**: All possible inputs to a reducer (commands, effect feedback, events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic given their
/// environment, which makes them directly unit-testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for ReservationReducer {
    ///     type State = LedgerState;
    ///     type Action = ReservationAction;
    ///     type Environment = ReservationEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut LedgerState,
    ///         action: ReservationAction,
    ///         env: &ReservationEnvironment,
    ///     ) -> SmallVec<[Effect<ReservationAction>; 4]> {
    ///         // Business logic goes here
    ///         SmallVec::new()
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime. They are
/// values (not execution): a reducer returns them, the store runs them.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into
        /// the reducer and broadcast to store observers.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation as an effect
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Self::Future(Box::pin(fut))
        }
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected via
/// the Environment parameter. Production code gets the system clock and a
/// thread-local RNG; tests get fixed clocks and seeded RNGs.
pub mod environment {
    use chrono::{DateTime, Utc};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Mutex;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the operating system
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Test clock that always returns the same instant
    #[derive(Clone, Copy, Debug)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Creates a clock pinned to `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Normalizes a probability into `[0.0, 1.0]`
    ///
    /// NaN maps to 0.0 so a malformed configuration value disables the draw
    /// instead of aborting the process.
    #[must_use]
    pub fn clamp_probability(probability: f64) -> f64 {
        if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        }
    }

    /// Source of random draws - abstracts randomness for testability
    ///
    /// Every probabilistic decision in the system (availability gating,
    /// payment authorization, simulated races) goes through this trait so
    /// tests can pin the outcome with a seed or a degenerate probability.
    pub trait RandomSource: Send + Sync {
        /// Returns true with the given probability (clamped to `[0, 1]`)
        fn chance(&self, probability: f64) -> bool;
    }

    /// Production randomness backed by the thread-local RNG
    #[derive(Clone, Copy, Debug, Default)]
    pub struct ThreadRandom;

    impl RandomSource for ThreadRandom {
        fn chance(&self, probability: f64) -> bool {
            rand::thread_rng().gen_bool(clamp_probability(probability))
        }
    }

    /// Deterministic randomness for tests, seeded explicitly
    #[derive(Debug)]
    pub struct SeededRandom {
        rng: Mutex<StdRng>,
    }

    impl SeededRandom {
        /// Creates a seeded source; the same seed yields the same draws
        #[must_use]
        pub fn new(seed: u64) -> Self {
            Self {
                rng: Mutex::new(StdRng::seed_from_u64(seed)),
            }
        }
    }

    impl RandomSource for SeededRandom {
        fn chance(&self, probability: f64) -> bool {
            let mut rng = match self.rng.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            rng.gen_bool(clamp_probability(probability))
        }
    }
}
