//! Tests for the booking lifecycle engine against a mocked ledger.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockBookingLedger;
use crate::domain::{CheckInId, ErrorCode, GuestCount, HotelId, RoomId, StayDates};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 12, 20, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn booking_id() -> BookingId {
    BookingId::new(11).expect("valid id")
}

#[fixture]
fn request() -> BookingRequest {
    BookingRequest {
        user_id: UserId::new(1).expect("valid id"),
        hotel_id: HotelId::new(2).expect("valid id"),
        room_id: RoomId::new(3).expect("valid id"),
        stay: StayDates::parse("2024-01-01", "2024-01-04").expect("valid stay"),
        guests: GuestCount::new(2).expect("valid guests"),
    }
}

fn booking_with(status: BookingStatus) -> Booking {
    let draft = BookingDraft::new(request(), fixture_now());
    let mut booking = Booking::reserved(booking_id(), &draft, 100).expect("valid booking");
    booking.status = status;
    booking
}

fn service(ledger: MockBookingLedger) -> BookingLifecycleService<MockBookingLedger> {
    BookingLifecycleService::new(
        Arc::new(ledger),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
    )
}

fn ledger_holding(status: BookingStatus) -> MockBookingLedger {
    let mut ledger = MockBookingLedger::new();
    ledger
        .expect_find_booking()
        .returning(move |_| Ok(Some(booking_with(status))));
    ledger
}

#[rstest]
#[tokio::test]
async fn create_booking_reserves_with_clock_timestamp(request: BookingRequest) {
    let mut ledger = MockBookingLedger::new();
    ledger
        .expect_reserve()
        .withf(|draft| draft.created_at == fixture_now() && draft.room_id.get() == 3)
        .times(1)
        .returning(|draft| {
            Ok(Reservation::Reserved(
                Booking::reserved(booking_id(), draft, 100).expect("valid booking"),
            ))
        });

    let booking = service(ledger)
        .create_booking(request)
        .await
        .expect("reservation succeeds");

    assert_eq!(booking.status, BookingStatus::Upcoming);
    assert_eq!(booking.total_amount, 300);
}

#[rstest]
#[case(Reservation::SoldOut, LifecycleError::NotAvailable)]
#[case(Reservation::RoomNotFound, LifecycleError::room_not_found())]
#[tokio::test]
async fn create_booking_surfaces_reservation_refusals(
    request: BookingRequest,
    #[case] outcome: Reservation,
    #[case] expected: LifecycleError,
) {
    let mut ledger = MockBookingLedger::new();
    ledger
        .expect_reserve()
        .times(1)
        .return_once(move |_| Ok(outcome));

    let error = service(ledger)
        .create_booking(request)
        .await
        .expect_err("reservation refused");

    assert_eq!(error, expected);
}

#[rstest]
#[tokio::test]
async fn create_booking_rejects_room_from_another_hotel(request: BookingRequest) {
    let mut ledger = MockBookingLedger::new();
    ledger
        .expect_reserve()
        .return_once(|_| Ok(Reservation::HotelMismatch));

    let error = service(ledger)
        .create_booking(request)
        .await
        .expect_err("mismatched hotel");

    assert!(matches!(error, LifecycleError::Validation { field: "roomId", .. }));
}

#[rstest]
#[case(BookingLedgerError::connection("pool exhausted"), ErrorCode::ServiceUnavailable)]
#[case(BookingLedgerError::query("deadlock"), ErrorCode::InternalError)]
#[case(BookingLedgerError::unknown_reference("user 1"), ErrorCode::InvalidRequest)]
#[tokio::test]
async fn create_booking_maps_store_failures(
    request: BookingRequest,
    #[case] failure: BookingLedgerError,
    #[case] expected: ErrorCode,
) {
    let mut ledger = MockBookingLedger::new();
    ledger.expect_reserve().return_once(move |_| Err(failure));

    let error = service(ledger)
        .create_booking(request)
        .await
        .expect_err("store failure");

    assert_eq!(Error::from(error).code(), expected);
}

#[rstest]
#[tokio::test]
async fn cancel_releases_room_with_compare_and_swap() {
    let mut ledger = ledger_holding(BookingStatus::Upcoming);
    ledger
        .expect_transition()
        .withf(|transition| {
            transition.expected == BookingStatus::Upcoming
                && transition.next == BookingStatus::Cancelled
                && transition.release_room
                && transition.check_in.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(TransitionOutcome::Applied {
                booking: booking_with(BookingStatus::Cancelled),
                check_in: None,
            })
        });

    let booking = service(ledger)
        .cancel_booking(booking_id())
        .await
        .expect("cancel succeeds");

    assert_eq!(booking.status, BookingStatus::Cancelled);
}

#[rstest]
#[case(BookingStatus::Cancelled)]
#[case(BookingStatus::CheckedIn)]
#[case(BookingStatus::CheckedOut)]
#[tokio::test]
async fn cancel_is_refused_outside_upcoming(#[case] status: BookingStatus) {
    let mut ledger = ledger_holding(status);
    ledger.expect_transition().times(0);

    let error = service(ledger)
        .cancel_booking(booking_id())
        .await
        .expect_err("cancel refused");

    assert_eq!(
        error.to_string(),
        "only upcoming bookings can be cancelled"
    );
}

#[rstest]
#[tokio::test]
async fn check_in_writes_record_with_status_change() {
    let mut ledger = ledger_holding(BookingStatus::Upcoming);
    ledger
        .expect_transition()
        .withf(|transition| {
            transition.next == BookingStatus::CheckedIn
                && !transition.release_room
                && transition
                    .check_in
                    .as_ref()
                    .is_some_and(|record| record.aadhaar.as_str() == "123456789012")
        })
        .times(1)
        .returning(|transition| {
            let record = transition.check_in.clone().expect("record supplied");
            Ok(TransitionOutcome::Applied {
                booking: booking_with(BookingStatus::CheckedIn),
                check_in: Some(CheckIn::recorded(
                    CheckInId::new(1).expect("valid id"),
                    record,
                )),
            })
        });

    let check_in = service(ledger)
        .perform_check_in(CheckInRequest {
            booking_id: booking_id(),
            aadhaar: "123456789012".to_owned(),
        })
        .await
        .expect("check-in succeeds");

    assert_eq!(check_in.booking_id, booking_id());
    assert_eq!(check_in.created_at, fixture_now());
}

#[rstest]
#[case(BookingStatus::CheckedIn, "already checked in")]
#[case(BookingStatus::CheckedOut, "cannot check-in after check-out")]
#[case(BookingStatus::Cancelled, "cannot check-in for a cancelled booking")]
#[tokio::test]
async fn check_in_is_gated_on_status(#[case] status: BookingStatus, #[case] reason: &str) {
    let mut ledger = ledger_holding(status);
    ledger.expect_transition().times(0);

    let error = service(ledger)
        .perform_check_in(CheckInRequest {
            booking_id: booking_id(),
            aadhaar: "123456789012".to_owned(),
        })
        .await
        .expect_err("check-in refused");

    assert!(matches!(error, LifecycleError::InvalidState(_)));
    assert_eq!(error.to_string(), reason);
}

#[rstest]
#[case("12345678901")]
#[case("1234567890123")]
#[case("12345678901x")]
#[case("١٢٣٤٥٦٧٨٩٠١٢")]
#[tokio::test]
async fn check_in_revalidates_aadhaar(#[case] aadhaar: &str) {
    let mut ledger = MockBookingLedger::new();
    ledger.expect_find_booking().times(0);

    let error = service(ledger)
        .perform_check_in(CheckInRequest {
            booking_id: booking_id(),
            aadhaar: aadhaar.to_owned(),
        })
        .await
        .expect_err("malformed aadhaar");

    assert!(matches!(error, LifecycleError::Validation { field: "aadhaar", .. }));
}

#[rstest]
#[tokio::test]
async fn check_out_from_upcoming_is_refused() {
    let mut ledger = ledger_holding(BookingStatus::Upcoming);
    ledger.expect_transition().times(0);

    let error = service(ledger)
        .check_out(booking_id())
        .await
        .expect_err("check-out refused");

    assert_eq!(error.to_string(), "only checked-in guests can check out");
}

#[rstest]
#[tokio::test]
async fn check_out_releases_room() {
    let mut ledger = ledger_holding(BookingStatus::CheckedIn);
    ledger
        .expect_transition()
        .withf(|transition| {
            transition.expected == BookingStatus::CheckedIn
                && transition.next == BookingStatus::CheckedOut
                && transition.release_room
        })
        .times(1)
        .returning(|_| {
            Ok(TransitionOutcome::Applied {
                booking: booking_with(BookingStatus::CheckedOut),
                check_in: None,
            })
        });

    let booking = service(ledger)
        .check_out(booking_id())
        .await
        .expect("check-out succeeds");

    assert_eq!(booking.status, BookingStatus::CheckedOut);
}

#[rstest]
#[tokio::test]
async fn lost_race_reports_reason_for_winning_status() {
    let mut ledger = ledger_holding(BookingStatus::Upcoming);
    ledger.expect_transition().times(1).returning(|_| {
        Ok(TransitionOutcome::StatusChanged {
            current: BookingStatus::Cancelled,
        })
    });

    let error = service(ledger)
        .perform_check_in(CheckInRequest {
            booking_id: booking_id(),
            aadhaar: "123456789012".to_owned(),
        })
        .await
        .expect_err("race lost");

    assert_eq!(error.to_string(), "cannot check-in for a cancelled booking");
}

#[rstest]
#[tokio::test]
async fn missing_booking_is_not_found() {
    let mut ledger = MockBookingLedger::new();
    ledger.expect_find_booking().returning(|_| Ok(None));

    let error = service(ledger)
        .check_out(booking_id())
        .await
        .expect_err("missing booking");

    assert_eq!(error, LifecycleError::booking_not_found());
}

#[rstest]
#[tokio::test]
async fn query_failures_become_internal_errors() {
    let mut ledger = MockBookingLedger::new();
    ledger
        .expect_bookings_for_user()
        .return_once(|_| Err(BookingLedgerError::query("broken join")));

    let error = service(ledger)
        .bookings_for_user(UserId::new(1).expect("valid id"))
        .await
        .expect_err("query failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
