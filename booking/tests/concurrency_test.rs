//! Concurrency tests.
//!
//! Verifies that racing reservation attempts cannot double-book: the
//! conflict check and the ledger commit run in one reducer invocation
//! under the store's write lock, so exactly one attempt per slot wins.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use chrono::{NaiveDate, NaiveTime};
use crease_kings_booking::{
    BookingApp, BookingError, GroundId, PaymentCard, ReservationRequest, SimulationPolicy,
};
use crease_kings_core::environment::SeededRandom;
use crease_kings_testing::test_clock;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn deterministic_app() -> Arc<BookingApp> {
    Arc::new(
        BookingApp::builder()
            .with_policy(SimulationPolicy::certain())
            .with_random(Arc::new(SeededRandom::new(9)))
            .with_clock(Arc::new(test_clock()))
            .build(),
    )
}

fn request_at(hour: u32) -> ReservationRequest {
    ReservationRequest {
        ground: GroundId::new("ground-alpha-cricket"),
        date: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
        start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
        payment: Some(PaymentCard {
            card_number: "4242424242424242".to_string(),
            expiry_date: "12/27".to_string(),
            cvc: "123".to_string(),
        }),
    }
}

/// Test 1: The last-slot problem
///
/// Twelve identical attempts race for the same slot; exactly one commits
/// and every other attempt observes the conflict.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_attempts_on_one_slot_yield_exactly_one_winner() {
    init_tracing();
    println!("🧪 Test 1: racing attempts on one slot");

    let app = deterministic_app();

    let mut handles = Vec::new();
    for _ in 0..12 {
        let app = Arc::clone(&app);
        handles.push(tokio::spawn(
            async move { app.reserve_slot(request_at(9)).await },
        ));
    }

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(confirmation) => {
                assert_eq!(
                    confirmation.start_time,
                    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
                );
                winners += 1;
            }
            Err(BookingError::SlotConflict) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners, 1, "exactly one attempt may commit");
    assert_eq!(conflicts, 11);

    println!("  ✅ one winner, {conflicts} conflicts");
}

/// Test 2: Disjoint slots don't contend
///
/// One attempt per grid slot, all in flight at once; every attempt
/// commits and the whole day ends up reserved.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_attempts_on_distinct_slots_all_win() {
    init_tracing();
    println!("🧪 Test 2: racing attempts on distinct slots");

    let app = deterministic_app();

    let mut handles = Vec::new();
    for hour in 8..22u32 {
        let app = Arc::clone(&app);
        handles.push(tokio::spawn(async move {
            app.reserve_slot(request_at(hour)).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let slots = app
        .list_time_slots(
            &GroundId::new("ground-alpha-cricket"),
            NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(slots.len(), 14);
    assert!(slots.iter().all(|slot| !slot.available));

    println!("  ✅ all {} slots committed", slots.len());
}

/// Test 3: Sequential double-booking is impossible
///
/// The second of two back-to-back identical attempts must observe the
/// first commit, regardless of random draws.
#[tokio::test]
async fn immediate_rebooking_conflicts() {
    init_tracing();
    println!("🧪 Test 3: immediate rebooking");

    let app = deterministic_app();

    let first = app.reserve_slot(request_at(9)).await;
    let second = app.reserve_slot(request_at(9)).await;

    assert!(first.is_ok());
    assert_eq!(second, Err(BookingError::SlotConflict));

    println!("  ✅ second attempt conflicted");
}
