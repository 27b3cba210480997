//! Booking aggregate and its status state machine.
//!
//! ```text
//! upcoming --cancel--> cancelled            [terminal]
//! upcoming --checkIn--> checked-in
//! checked-in --checkOut--> checked-out      [terminal]
//! ```
//!
//! The transition table lives in [`BookingStatus::apply`]; stores only ever
//! receive transitions that passed through it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingId, Hotel, HotelId, Room, RoomId, UserId};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lifecycle stage of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Upcoming,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

/// State-changing operations applied to an existing booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Cancel,
    CheckIn,
    CheckOut,
}

impl LifecycleEvent {
    /// Whether the event hands the booked unit back to the room pool.
    pub fn releases_inventory(self) -> bool {
        matches!(self, Self::Cancel | Self::CheckOut)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::CheckIn => "check-in",
            Self::CheckOut => "check-out",
        }
    }
}

/// A lifecycle event that is not allowed from the booking's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: BookingStatus,
    pub event: LifecycleEvent,
}

impl InvalidTransition {
    /// Human-readable reason surfaced to callers.
    pub fn reason(&self) -> &'static str {
        match (self.event, self.from) {
            (LifecycleEvent::CheckIn, BookingStatus::CheckedOut) => {
                "cannot check-in after check-out"
            }
            (LifecycleEvent::CheckIn, BookingStatus::Cancelled) => {
                "cannot check-in for a cancelled booking"
            }
            (LifecycleEvent::CheckIn, _) => "already checked in",
            (LifecycleEvent::CheckOut, _) => "only checked-in guests can check out",
            (LifecycleEvent::Cancel, _) => "only upcoming bookings can be cancelled",
        }
    }
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for InvalidTransition {}

impl BookingStatus {
    /// Status reached by applying `event`, or the reason it is refused.
    ///
    /// # Examples
    /// ```
    /// use hotel_booking::domain::{BookingStatus, LifecycleEvent};
    ///
    /// assert_eq!(
    ///     BookingStatus::Upcoming.apply(LifecycleEvent::CheckIn),
    ///     Ok(BookingStatus::CheckedIn)
    /// );
    /// let refused = BookingStatus::CheckedIn
    ///     .apply(LifecycleEvent::CheckIn)
    ///     .unwrap_err();
    /// assert_eq!(refused.reason(), "already checked in");
    /// ```
    pub fn apply(self, event: LifecycleEvent) -> Result<Self, InvalidTransition> {
        match (self, event) {
            (Self::Upcoming, LifecycleEvent::Cancel) => Ok(Self::Cancelled),
            (Self::Upcoming, LifecycleEvent::CheckIn) => Ok(Self::CheckedIn),
            (Self::CheckedIn, LifecycleEvent::CheckOut) => Ok(Self::CheckedOut),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::CheckedIn => "checked-in",
            Self::CheckedOut => "checked-out",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBookingStatus(pub String);

impl fmt::Display for UnknownBookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown booking status '{}'", self.0)
    }
}

impl std::error::Error for UnknownBookingStatus {}

impl FromStr for BookingStatus {
    type Err = UnknownBookingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "checked-in" => Ok(Self::CheckedIn),
            "checked-out" => Ok(Self::CheckedOut),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownBookingStatus(other.to_owned())),
        }
    }
}

/// Validation errors for booking input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    MalformedDate { field: &'static str },
    EmptyStay,
    NoGuests,
    AmountOverflow,
}

impl BookingValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::MalformedDate { field } => field,
            Self::EmptyStay => "checkOut",
            Self::NoGuests => "guests",
            Self::AmountOverflow => "price",
        }
    }
}

impl fmt::Display for BookingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedDate { field } => write!(f, "{field} must be a YYYY-MM-DD date"),
            Self::EmptyStay => write!(f, "checkOut must be after checkIn"),
            Self::NoGuests => write!(f, "guests must be at least 1"),
            Self::AmountOverflow => write!(f, "total amount exceeds the supported range"),
        }
    }
}

impl std::error::Error for BookingValidationError {}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(
    raw: &str,
    field: &'static str,
) -> Result<NaiveDate, BookingValidationError> {
    let shape_ok = raw.len() == 10
        && raw.char_indices().all(|(idx, c)| match idx {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(BookingValidationError::MalformedDate { field });
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| BookingValidationError::MalformedDate { field })
}

/// Check-in and check-out calendar days.
///
/// ## Invariants
/// - `check_out` is strictly after `check_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, BookingValidationError> {
        if check_out <= check_in {
            return Err(BookingValidationError::EmptyStay);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Parse both dates from `YYYY-MM-DD` strings.
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, BookingValidationError> {
        Self::new(
            parse_calendar_date(check_in, "checkIn")?,
            parse_calendar_date(check_out, "checkOut")?,
        )
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Flat nightly rate multiplied by the number of nights.
    pub fn total_for(&self, nightly_rate: i64) -> Result<i64, BookingValidationError> {
        nightly_rate
            .checked_mul(self.nights())
            .ok_or(BookingValidationError::AmountOverflow)
    }
}

/// Number of guests on a booking; at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestCount(u32);

impl GuestCount {
    pub fn new(value: i64) -> Result<Self, BookingValidationError> {
        u32::try_from(value)
            .ok()
            .filter(|count| *count >= 1)
            .map(Self)
            .ok_or(BookingValidationError::NoGuests)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Typed input for booking creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub user_id: UserId,
    pub hotel_id: HotelId,
    pub room_id: RoomId,
    pub stay: StayDates,
    pub guests: GuestCount,
}

/// Booking ready to be reserved, stamped with its creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub user_id: UserId,
    pub hotel_id: HotelId,
    pub room_id: RoomId,
    pub stay: StayDates,
    pub guests: GuestCount,
    pub created_at: DateTime<Utc>,
}

impl BookingDraft {
    pub fn new(request: BookingRequest, created_at: DateTime<Utc>) -> Self {
        let BookingRequest {
            user_id,
            hotel_id,
            room_id,
            stay,
            guests,
        } = request;
        Self {
            user_id,
            hotel_id,
            room_id,
            stay,
            guests,
            created_at,
        }
    }
}

/// Persisted booking. Never deleted; terminal statuses are kept for history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub hotel_id: HotelId,
    pub room_id: RoomId,
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub check_in: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2024-01-04")]
    pub check_out: NaiveDate,
    #[schema(example = 2)]
    pub guests: u32,
    pub status: BookingStatus,
    /// Nightly rate × nights, fixed when the booking is created.
    #[schema(example = 300)]
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Build the upcoming booking produced by a successful reservation.
    pub fn reserved(
        id: BookingId,
        draft: &BookingDraft,
        nightly_rate: i64,
    ) -> Result<Self, BookingValidationError> {
        Ok(Self {
            id,
            user_id: draft.user_id,
            hotel_id: draft.hotel_id,
            room_id: draft.room_id,
            check_in: draft.stay.check_in(),
            check_out: draft.stay.check_out(),
            guests: draft.guests.get(),
            status: BookingStatus::Upcoming,
            total_amount: draft.stay.total_for(nightly_rate)?,
            created_at: draft.created_at,
        })
    }
}

/// Booking joined with its hotel and room for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub hotel: Hotel,
    pub room: Room,
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
