//! # Crease Kings Runtime
//!
//! Store implementation for the Crease Kings booking engine.
//!
//! The [`Store`] owns a piece of domain state and is the only path to
//! mutating it. Every action is processed by the reducer while the store
//! holds the state write lock, so concurrent senders serialize at the
//! reducer: a check-then-write sequence inside one reducer invocation is
//! atomic with respect to every other action. This is what makes the
//! reservation ledger safe against double-booking without any locking in
//! domain code.
//!
//! ## Effect execution
//!
//! Reducers return [`Effect`] descriptions. The store runs each
//! `Effect::Future` on a spawned task; when the future resolves to an
//! action, that action is fed back through the reducer and then broadcast
//! to observers. [`Store::send_and_wait_for`] builds a request-response
//! pattern on top of the broadcast: subscribe, send, and wait for the
//! first action matching a predicate.

use crease_kings_core::effect::Effect;
use crease_kings_core::reducer::Reducer;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{RwLock, broadcast};

/// Errors produced by store operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Timeout expired before a matching action was observed
    #[error("timed out waiting for a matching action")]
    Timeout,

    /// The action broadcast channel closed while waiting
    #[error("action broadcast channel closed")]
    ChannelClosed,
}

/// Default capacity of the action broadcast channel
const DEFAULT_BROADCAST_CAPACITY: usize = 16;

/// The Store - owns state and processes actions through a reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(
///     LedgerState::new(),
///     ReservationReducer::new(),
///     environment,
/// );
///
/// store.send(ReservationAction::RequestReservation { .. }).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    pending_effects: Arc<AtomicUsize>,
    /// Action broadcast channel for observing actions produced by effects.
    ///
    /// Actions produced by effects (e.g. from `Effect::Future`) are
    /// broadcast to observers after the store has processed them. This
    /// enables request-response flows over the store.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// The action broadcast capacity defaults to 16; use
    /// [`Store::with_broadcast_capacity`] when many concurrent waiters are
    /// expected.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, DEFAULT_BROADCAST_CAPACITY)
    }

    /// Create a new store with a custom action broadcast capacity
    ///
    /// Waiters that lag behind the broadcast lose actions; size the channel
    /// for the expected number of in-flight request-response flows.
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity.max(1));

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
        }
    }

    /// Send an action through the store
    ///
    /// 1. Acquires the state write lock
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Executes returned effects on spawned tasks
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// `send` returns after starting effect execution, not completion.
    /// Multiple concurrent `send` calls serialize at the reducer.
    pub async fn send(&self, action: A) {
        self.handle(action).await;
    }

    /// Send an action and wait for a matching result action
    ///
    /// Designed for request-response flows: subscribe to the action
    /// broadcast BEFORE sending (avoiding the race where the result lands
    /// between send and subscribe), send the action, then wait for the
    /// first effect-produced action matching the predicate.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: timeout expired before a matching action
    /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribe BEFORE sending to avoid a race condition
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Slow consumer; if the matching action was dropped
                        // the timeout catches it.
                        tracing::warn!(skipped, "action observer lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    }
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to all actions produced by effects on this store
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Run a closure against a read snapshot of the state
    pub async fn with_state<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        let state = self.state.read().await;
        f(&state)
    }

    /// Clone the current state
    pub async fn state(&self) -> S
    where
        S: Clone,
    {
        self.state.read().await.clone()
    }

    /// Number of effects currently executing
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.pending_effects.load(Ordering::SeqCst)
    }

    /// Wait until every in-flight effect (including feedback) has finished
    ///
    /// Intended for tests and shutdown paths that need quiescence.
    pub async fn settled(&self) {
        while self.pending_effects() > 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Process one action and start its effects
    ///
    /// Boxed so effect feedback can re-enter the store from spawned tasks.
    fn handle(&self, action: A) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> {
        let store = self.clone();
        Box::pin(async move {
            let effects = {
                let mut state = store.state.write().await;
                store.reducer.reduce(&mut state, action, &store.environment)
            };

            for effect in effects {
                match effect {
                    Effect::None => {}
                    Effect::Future(fut) => {
                        store.pending_effects.fetch_add(1, Ordering::SeqCst);
                        let inner = store.clone();
                        tokio::spawn(async move {
                            if let Some(next) = fut.await {
                                // Feed back before broadcasting so waiters
                                // observe state that already includes the
                                // action's changes.
                                inner.handle(next.clone()).await;
                                let _ = inner.action_broadcast.send(next);
                            }
                            inner.pending_effects.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                }
            }
        })
    }
}
