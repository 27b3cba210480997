//! Driven port over the booking, room-inventory and check-in stores.
//!
//! Every mutating method is one atomic unit of work: adapters must apply
//! all of its effects or none of them, and must make the availability check
//! and the counter change a single step so concurrent callers cannot both
//! claim the last unit.

use async_trait::async_trait;

use crate::domain::{
    Booking, BookingDraft, BookingId, BookingStatus, BookingView, CheckIn, NewCheckIn, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking ledger adapters.
    pub enum BookingLedgerError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "booking ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "booking ledger query failed: {message}",
        /// A row referenced by the booking (typically the guest) does not exist.
        UnknownReference { message: String } =>
            "booking references a missing record: {message}",
    }
}

/// Outcome of an attempt to reserve one unit of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// The counter was decremented and the booking stored.
    Reserved(Booking),
    /// No room with the requested id exists.
    RoomNotFound,
    /// The room exists but belongs to a different hotel.
    HotelMismatch,
    /// The room has no units left.
    SoldOut,
    /// Nightly rate × nights does not fit the amount type.
    AmountOverflow,
}

/// Status change to apply with compare-and-swap semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub booking_id: BookingId,
    /// Status the booking must still have for the change to apply.
    pub expected: BookingStatus,
    pub next: BookingStatus,
    /// Return one unit to the room, never exceeding its total.
    pub release_room: bool,
    /// Record written together with the status change.
    pub check_in: Option<NewCheckIn>,
}

/// Outcome of a status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Status updated; carries the booking and any check-in record written.
    Applied {
        booking: Booking,
        check_in: Option<CheckIn>,
    },
    /// The booking does not exist.
    BookingNotFound,
    /// Another request changed the status first; nothing was written.
    StatusChanged { current: BookingStatus },
}

/// Port for the booking ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Claim one unit of the draft's room and store the booking as upcoming.
    async fn reserve(&self, draft: &BookingDraft) -> Result<Reservation, BookingLedgerError>;

    /// Apply a status change and its side effects atomically.
    async fn transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<TransitionOutcome, BookingLedgerError>;

    /// Find a booking by id.
    async fn find_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, BookingLedgerError>;

    /// Bookings made by a guest, joined with hotel and room, newest first.
    async fn bookings_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BookingView>, BookingLedgerError>;

    /// Check-in records for a booking, oldest first.
    async fn check_ins_for_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<CheckIn>, BookingLedgerError>;
}
