//! Hourly slot grid and availability generation.
//!
//! Every ground shares the same opening window: fourteen one-hour slots
//! from 08:00 to 22:00, regardless of sport or venue (a deliberate
//! simplification: per-venue hours are not modelled). Availability is
//! recomputed on every query: slots already in the reservation ledger are
//! always unavailable, every other slot is gated by an independent random
//! draw, so two queries for the same ground-day can differ until a slot is
//! booked.

use crate::types::{LedgerKey, LedgerState, TimeSlot};
use chrono::{NaiveTime, Timelike};
use crease_kings_core::environment::RandomSource;

/// First bookable hour of the day
pub const OPENING_HOUR: u32 = 8;

/// Hour the grounds close; the last slot ends here
pub const CLOSING_HOUR: u32 = 22;

/// Number of one-hour slots per ground-day
pub const SLOTS_PER_DAY: usize = (CLOSING_HOUR - OPENING_HOUR) as usize;

fn on_the_hour(hour: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, 0, 0)
}

/// The fixed grid of bookable intervals, ordered by start time
#[must_use]
pub fn slot_grid() -> Vec<(NaiveTime, NaiveTime)> {
    (OPENING_HOUR..CLOSING_HOUR)
        .filter_map(|hour| Some((on_the_hour(hour)?, on_the_hour(hour + 1)?)))
        .collect()
}

/// Whether an interval is one of the grid's bookable one-hour slots
#[must_use]
pub fn is_bookable_slot(start_time: NaiveTime, end_time: NaiveTime) -> bool {
    start_time.minute() == 0
        && start_time.second() == 0
        && end_time.minute() == 0
        && end_time.second() == 0
        && (OPENING_HOUR..CLOSING_HOUR).contains(&start_time.hour())
        && end_time.hour() == start_time.hour() + 1
}

/// Generate the slot listing for one ground-day
///
/// Reserved start times are unavailable unconditionally; the remaining
/// slots each take an independent draw against `availability_probability`.
#[must_use]
pub fn generate(
    ledger: &LedgerState,
    key: &LedgerKey,
    availability_probability: f64,
    random: &dyn RandomSource,
) -> Vec<TimeSlot> {
    slot_grid()
        .into_iter()
        .map(|(start_time, end_time)| TimeSlot {
            start_time,
            end_time,
            available: !ledger.is_reserved(key, start_time)
                && random.chance(availability_probability),
        })
        .collect()
}
