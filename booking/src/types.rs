//! Domain types for the Crease Kings booking engine.
//!
//! This module contains the value objects, entities, and state types for the
//! booking system: the ground catalog entries, time slots, payment details,
//! and the in-memory reservation ledger.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a ground (a human-readable slug, e.g.
/// `ground-alpha-cricket`)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroundId(String);

impl GroundId {
    /// Creates a `GroundId` from a slug
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Get the slug as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroundId {
    fn from(slug: &str) -> Self {
        Self::new(slug)
    }
}

impl fmt::Display for GroundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random `ReservationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ReservationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (paise-based to avoid floating point errors)
// ============================================================================

/// Represents money in paise to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from paise
    #[must_use]
    pub const fn from_paise(paise: u64) -> Self {
        Self(paise)
    }

    /// Creates a `Money` value from whole rupees (saturating on overflow)
    #[must_use]
    pub const fn from_rupees(rupees: u64) -> Self {
        Self(rupees.saturating_mul(100))
    }

    /// Returns the amount in paise
    #[must_use]
    pub const fn paise(&self) -> u64 {
        self.0
    }

    /// Returns the amount in whole rupees (rounded down)
    #[must_use]
    pub const fn rupees(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Catalog Entities
// ============================================================================

/// Sport category a ground is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    /// Box cricket
    Cricket,
    /// Pickleball
    Pickleball,
    /// Volleyball
    Volleyball,
    /// Basketball
    Basketball,
    /// Badminton
    Badminton,
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cricket => "cricket",
            Self::Pickleball => "pickleball",
            Self::Volleyball => "volleyball",
            Self::Basketball => "basketball",
            Self::Badminton => "badminton",
        };
        write!(f, "{name}")
    }
}

/// A bookable sports venue
///
/// Immutable for the process lifetime; the catalog is defined at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    /// Unique identifier
    pub id: GroundId,
    /// Display name
    pub name: String,
    /// Human-readable location
    pub location: String,
    /// Pricing per one-hour slot
    pub price_per_hour: Money,
    /// Sport category
    pub sport: Sport,
    /// Image gallery URLs
    pub image_urls: Vec<String>,
    /// Amenities offered at the venue
    pub amenities: Vec<String>,
    /// Average customer rating (0.0 - 5.0), if any
    pub rating: Option<f32>,
}

// ============================================================================
// Time Slots
// ============================================================================

/// Serde helper rendering slot times as `HH:MM`
pub mod slot_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    /// Format used on the boundary surface
    pub const FORMAT: &str = "%H:%M";

    /// Serializes a `NaiveTime` as `HH:MM`
    ///
    /// # Errors
    ///
    /// Forwards serializer errors.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    /// Deserializes a `NaiveTime` from `HH:MM`
    ///
    /// # Errors
    ///
    /// Fails when the input is not a valid `HH:MM` time.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(Error::custom)
    }
}

/// One bookable hour-long interval on a given date for a given ground
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Start of the interval
    #[serde(with = "slot_time")]
    pub start_time: NaiveTime,
    /// End of the interval
    #[serde(with = "slot_time")]
    pub end_time: NaiveTime,
    /// Whether the slot can currently be booked
    pub available: bool,
}

// ============================================================================
// Payment
// ============================================================================

/// Payment card details submitted with a booking
///
/// This is simulation input only; nothing is charged and nothing is stored
/// beyond the request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCard {
    /// Card number
    pub card_number: String,
    /// Card expiry date (`MM/YY`)
    pub expiry_date: String,
    /// Card verification code
    pub cvc: String,
}

impl PaymentCard {
    /// Last four digits of the card number, for logging
    #[must_use]
    pub fn last_four(&self) -> &str {
        self.card_number
            .len()
            .checked_sub(4)
            .and_then(|start| self.card_number.get(start..))
            .unwrap_or(&self.card_number)
    }
}

// Card number and CVC never reach log output in full
impl fmt::Debug for PaymentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentCard")
            .field("card_number", &format_args!("****{}", self.last_four()))
            .field("expiry_date", &self.expiry_date)
            .field("cvc", &"***")
            .finish()
    }
}

// ============================================================================
// Reservation Requests and Confirmations
// ============================================================================

/// A request to reserve one slot at a ground
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// Ground to book
    pub ground: GroundId,
    /// Booking date
    pub date: NaiveDate,
    /// Slot start time
    #[serde(with = "slot_time")]
    pub start_time: NaiveTime,
    /// Slot end time
    #[serde(with = "slot_time")]
    pub end_time: NaiveTime,
    /// Payment card details, if supplied
    pub payment: Option<PaymentCard>,
}

/// Confirmation returned for a successfully committed reservation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReservationConfirmation {
    /// Reservation identifier
    pub reservation_id: ReservationId,
    /// Ground booked
    pub ground: GroundId,
    /// Booking date
    pub date: NaiveDate,
    /// Slot start time
    #[serde(with = "slot_time")]
    pub start_time: NaiveTime,
    /// Slot end time
    #[serde(with = "slot_time")]
    pub end_time: NaiveTime,
    /// Amount charged
    pub amount: Money,
    /// When the reservation was committed
    pub reserved_at: DateTime<Utc>,
}

// ============================================================================
// Reservation Ledger
// ============================================================================

/// Key addressing one ground-day in the reservation ledger
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LedgerKey {
    /// Ground identifier
    pub ground: GroundId,
    /// Booking date
    pub date: NaiveDate,
}

impl LedgerKey {
    /// Creates a ledger key
    #[must_use]
    pub const fn new(ground: GroundId, date: NaiveDate) -> Self {
        Self { ground, date }
    }
}

/// One committed reservation in the ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationRecord {
    /// Reservation identifier
    pub reservation_id: ReservationId,
    /// Reserved slot start time
    pub start_time: NaiveTime,
    /// When the reservation was committed
    pub reserved_at: DateTime<Utc>,
}

/// The in-memory reservation ledger
///
/// Maps each ground-day to the reservations committed for it. Grows
/// monotonically for the process lifetime: reservations are never cancelled
/// or persisted. All mutation happens inside the reservation reducer while
/// the store holds the state write lock.
#[derive(Clone, Debug, Default)]
pub struct LedgerState {
    /// Committed reservations, keyed by ground-day
    pub entries: HashMap<LedgerKey, BTreeMap<NaiveTime, ReservationRecord>>,
    /// Most recent rejection, for diagnostics and tests
    pub last_error: Option<String>,
}

impl LedgerState {
    /// Creates an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a start time is already reserved for a ground-day
    #[must_use]
    pub fn is_reserved(&self, key: &LedgerKey, start_time: NaiveTime) -> bool {
        self.entries
            .get(key)
            .is_some_and(|slots| slots.contains_key(&start_time))
    }

    /// Record a committed reservation
    ///
    /// Idempotent: replaying an already-recorded reservation keeps the
    /// original record.
    pub fn record(&mut self, key: LedgerKey, record: ReservationRecord) {
        self.entries
            .entry(key)
            .or_default()
            .entry(record.start_time)
            .or_insert(record);
    }

    /// Reservations committed for a ground-day, ordered by start time
    #[must_use]
    pub fn reservations_for(&self, key: &LedgerKey) -> Vec<&ReservationRecord> {
        self.entries
            .get(key)
            .map(|slots| slots.values().collect())
            .unwrap_or_default()
    }

    /// Total number of committed reservations across all ground-days
    #[must_use]
    pub fn total_reservations(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nine_am() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    fn record_at(time: NaiveTime) -> ReservationRecord {
        ReservationRecord {
            reservation_id: ReservationId::new(),
            start_time: time,
            reserved_at: Utc.with_ymd_and_hms(2024, 7, 10, 8, 30, 0).unwrap(),
        }
    }

    #[test]
    fn money_converts_between_rupees_and_paise() {
        let price = Money::from_rupees(1200);
        assert_eq!(price.paise(), 120_000);
        assert_eq!(price.rupees(), 1200);
        assert!(!price.is_zero());
        assert_eq!(price.to_string(), "₹1200.00");
        assert_eq!(Money::from_paise(50).to_string(), "₹0.50");
    }

    #[test]
    fn ground_id_displays_its_slug() {
        let id = GroundId::new("ground-alpha-cricket");
        assert_eq!(id.as_str(), "ground-alpha-cricket");
        assert_eq!(id.to_string(), "ground-alpha-cricket");
    }

    #[test]
    fn payment_card_debug_masks_sensitive_fields() {
        let card = PaymentCard {
            card_number: "4242424242424242".to_string(),
            expiry_date: "12/27".to_string(),
            cvc: "123".to_string(),
        };
        let rendered = format!("{card:?}");
        assert!(rendered.contains("****4242"));
        assert!(!rendered.contains("4242424242424242"));
        assert!(!rendered.contains("123"));
    }

    #[test]
    fn payment_card_last_four_handles_short_numbers() {
        let card = PaymentCard {
            card_number: "42".to_string(),
            expiry_date: "12/27".to_string(),
            cvc: "123".to_string(),
        };
        assert_eq!(card.last_four(), "42");
    }

    #[test]
    fn time_slot_serializes_as_hh_mm() {
        let slot = TimeSlot {
            start_time: nine_am(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            available: true,
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["start_time"], "09:00");
        assert_eq!(json["end_time"], "10:00");
    }

    #[test]
    fn ledger_records_are_idempotent() {
        let mut ledger = LedgerState::new();
        let key = LedgerKey::new(GroundId::new("ground-alpha-cricket"), date());
        let first = record_at(nine_am());
        let original_id = first.reservation_id;

        ledger.record(key.clone(), first);
        ledger.record(key.clone(), record_at(nine_am()));

        assert_eq!(ledger.total_reservations(), 1);
        assert!(ledger.is_reserved(&key, nine_am()));
        assert_eq!(
            ledger.reservations_for(&key)[0].reservation_id,
            original_id
        );
    }

    #[test]
    fn ledger_keys_separate_grounds_and_dates() {
        let mut ledger = LedgerState::new();
        let alpha = LedgerKey::new(GroundId::new("ground-alpha-cricket"), date());
        let beta = LedgerKey::new(GroundId::new("ground-beta-cricket"), date());

        ledger.record(alpha.clone(), record_at(nine_am()));

        assert!(ledger.is_reserved(&alpha, nine_am()));
        assert!(!ledger.is_reserved(&beta, nine_am()));
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 10).unwrap()
    }
}
