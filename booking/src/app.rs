//! Application facade - the boundary surface consumed by a front end.
//!
//! [`BookingApp`] owns the catalog, the simulation policy, and the
//! reservation store, and exposes the four public operations: listing
//! grounds, fetching one ground, listing time slots, and reserving a slot.
//! The store is constructed once at startup and injected into nothing
//! else; every ledger mutation flows through it.

use crate::aggregates::reservation::{
    ReservationAction, ReservationEnvironment, ReservationReducer,
};
use crate::availability;
use crate::catalog::GroundCatalog;
use crate::config::Config;
use crate::error::BookingError;
use crate::payment_gateway::{PaymentGateway, SimulatedPaymentGateway};
use crate::simulation::SimulationPolicy;
use crate::types::{
    Ground, GroundId, LedgerKey, LedgerState, ReservationConfirmation, ReservationRequest,
    TimeSlot,
};
use chrono::NaiveDate;
use crease_kings_core::environment::{Clock, RandomSource, SystemClock, ThreadRandom};
use crease_kings_runtime::Store;
use std::sync::Arc;
use std::time::Duration;

/// Extra time granted to a booking flow beyond its simulated latencies
/// before the facade gives up waiting for a terminal action
const TERMINAL_WAIT_MARGIN: Duration = Duration::from_secs(5);

/// Capacity of the store's action broadcast; sized for bursts of
/// concurrent booking attempts
const BROADCAST_CAPACITY: usize = 256;

type ReservationStore =
    Store<LedgerState, ReservationAction, ReservationEnvironment, ReservationReducer>;

/// The booking engine facade
pub struct BookingApp {
    catalog: GroundCatalog,
    store: ReservationStore,
    policy: SimulationPolicy,
    random: Arc<dyn RandomSource>,
}

impl BookingApp {
    /// Creates an app from configuration with production dependencies
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::builder()
            .with_policy(SimulationPolicy::from_config(&config.simulation))
            .allow_unpaid(config.booking.allow_unpaid)
            .build()
    }

    /// Creates a builder for injecting alternative dependencies (tests)
    #[must_use]
    pub fn builder() -> BookingAppBuilder {
        BookingAppBuilder::default()
    }

    /// List the full ground catalog
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::TransientFailure`] when the simulated
    /// catalog fetch fails (disabled by default).
    pub async fn list_grounds(&self) -> Result<Vec<Ground>, BookingError> {
        tokio::time::sleep(self.policy.catalog_latency).await;
        tracing::info!("listing grounds");

        if self.random.chance(self.policy.catalog_failure_probability) {
            tracing::error!("simulated catalog fetch failure");
            return Err(BookingError::TransientFailure {
                reason: "catalog fetch failed".to_string(),
            });
        }

        Ok(self.catalog.all().to_vec())
    }

    /// Fetch a single ground by identifier
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::GroundNotFound`] for an unknown identifier.
    pub async fn ground(&self, id: &GroundId) -> Result<Ground, BookingError> {
        tokio::time::sleep(self.policy.catalog_latency).await;
        tracing::info!(%id, "fetching ground");

        self.catalog
            .find(id)
            .cloned()
            .ok_or_else(|| BookingError::GroundNotFound(id.clone()))
    }

    /// List the time slots for a ground on a date
    ///
    /// Reserved start times are always unavailable; the rest are re-rolled
    /// against the availability probability on every call.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::GroundNotFound`] for an unknown identifier.
    pub async fn list_time_slots(
        &self,
        id: &GroundId,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, BookingError> {
        tokio::time::sleep(self.policy.slots_latency).await;
        tracing::info!(%id, %date, "listing time slots");

        if self.catalog.find(id).is_none() {
            return Err(BookingError::GroundNotFound(id.clone()));
        }

        let key = LedgerKey::new(id.clone(), date);
        let probability = self.policy.availability_probability;
        let random = Arc::clone(&self.random);
        let slots = self
            .store
            .with_state(|ledger| availability::generate(ledger, &key, probability, random.as_ref()))
            .await;

        Ok(slots)
    }

    /// Reserve one slot, driving the full simulated flow
    ///
    /// Runs payment authorization (when a card is supplied), the ledger
    /// conflict check, and the lost-race draw, then commits on success.
    ///
    /// # Errors
    ///
    /// - [`BookingError::GroundNotFound`] for an unknown ground
    /// - [`BookingError::InvalidSlot`] for an interval outside the grid
    /// - [`BookingError::PaymentRequired`] when unpaid bookings are disabled
    /// - [`BookingError::PaymentDeclined`] on a declined authorization
    /// - [`BookingError::SlotConflict`] when the slot is or became reserved
    /// - [`BookingError::TransientFailure`] on simulated infrastructure failure
    pub async fn reserve_slot(
        &self,
        request: ReservationRequest,
    ) -> Result<ReservationConfirmation, BookingError> {
        let ground = self
            .catalog
            .find(&request.ground)
            .ok_or_else(|| BookingError::GroundNotFound(request.ground.clone()))?;

        if !availability::is_bookable_slot(request.start_time, request.end_time) {
            return Err(BookingError::InvalidSlot);
        }

        let reservation_id = crate::types::ReservationId::new();
        tracing::info!(
            %reservation_id,
            ground = %request.ground,
            date = %request.date,
            start_time = %request.start_time,
            "booking slot"
        );

        let action = ReservationAction::RequestReservation {
            reservation_id,
            ground: request.ground,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            amount: ground.price_per_hour,
            payment: request.payment,
        };

        let timeout =
            self.policy.booking_latency + self.policy.payment_latency + TERMINAL_WAIT_MARGIN;
        let terminal = self
            .store
            .send_and_wait_for(
                action,
                move |candidate| {
                    matches!(
                        candidate,
                        ReservationAction::SlotReserved { reservation_id: id, .. }
                        | ReservationAction::ReservationRejected { reservation_id: id, .. }
                            if *id == reservation_id
                    )
                },
                timeout,
            )
            .await
            .map_err(|error| BookingError::TransientFailure {
                reason: error.to_string(),
            })?;

        match terminal {
            ReservationAction::SlotReserved {
                reservation_id,
                ground,
                date,
                start_time,
                end_time,
                amount,
                reserved_at,
            } => Ok(ReservationConfirmation {
                reservation_id,
                ground,
                date,
                start_time,
                end_time,
                amount,
                reserved_at,
            }),
            ReservationAction::ReservationRejected { reason, .. } => Err(reason.into()),
            // The predicate only admits the two terminal variants
            _ => Err(BookingError::TransientFailure {
                reason: "unexpected terminal action".to_string(),
            }),
        }
    }
}

/// Builder for [`BookingApp`], used to inject deterministic dependencies
pub struct BookingAppBuilder {
    catalog: GroundCatalog,
    policy: SimulationPolicy,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    gateway: Option<Arc<dyn PaymentGateway>>,
    allow_unpaid: bool,
}

impl Default for BookingAppBuilder {
    fn default() -> Self {
        Self {
            catalog: GroundCatalog::builtin(),
            policy: SimulationPolicy::default(),
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRandom),
            gateway: None,
            allow_unpaid: true,
        }
    }
}

impl BookingAppBuilder {
    /// Replace the built-in catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: GroundCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the simulation policy
    #[must_use]
    pub fn with_policy(mut self, policy: SimulationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the randomness source
    #[must_use]
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Replace the payment gateway
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set whether bookings without payment details are accepted
    #[must_use]
    pub fn allow_unpaid(mut self, allow_unpaid: bool) -> Self {
        self.allow_unpaid = allow_unpaid;
        self
    }

    /// Build the app, constructing the store and default gateway
    #[must_use]
    pub fn build(self) -> BookingApp {
        let gateway = self.gateway.unwrap_or_else(|| {
            SimulatedPaymentGateway::shared(&self.policy, Arc::clone(&self.random))
        });

        let environment = ReservationEnvironment::new(
            self.clock,
            Arc::clone(&self.random),
            gateway,
            self.policy.clone(),
            self.allow_unpaid,
        );

        let store = Store::with_broadcast_capacity(
            LedgerState::new(),
            ReservationReducer::new(),
            environment,
            BROADCAST_CAPACITY,
        );

        BookingApp {
            catalog: self.catalog,
            store,
            policy: self.policy,
            random: self.random,
        }
    }
}
