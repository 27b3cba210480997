//! Booking lifecycle engine.
//!
//! Owns the rules that move a room's availability counter and a booking's
//! status together. Each operation reads the current state, checks the
//! transition against [`BookingStatus::apply`] and hands a single atomic
//! unit of work to the [`BookingLedger`]. Status changes are compare-and-swap
//! on the status that was read, so a request that loses a race is refused
//! with the reason derived from the status that won.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{
    BookingLedger, BookingLedgerError, BookingLifecycle, BookingQuery, Reservation,
    StatusTransition, TransitionOutcome,
};
use crate::domain::{
    Aadhaar, Booking, BookingDraft, BookingId, BookingRequest, BookingStatus, BookingView,
    CheckIn, CheckInRequest, Error, InvalidTransition, LifecycleError, LifecycleEvent, NewCheckIn,
    UserId,
};

fn map_ledger_error(error: BookingLedgerError) -> LifecycleError {
    match error {
        BookingLedgerError::Connection { message } => {
            error!(%message, "booking ledger unreachable");
            LifecycleError::Store {
                message,
                unavailable: true,
            }
        }
        BookingLedgerError::Query { message } => {
            error!(%message, "booking ledger query failed");
            LifecycleError::Store {
                message,
                unavailable: false,
            }
        }
        BookingLedgerError::UnknownReference { message } => {
            LifecycleError::validation("userId", format!("unknown guest: {message}"))
        }
    }
}

/// Lifecycle engine implementing the [`BookingLifecycle`] and
/// [`BookingQuery`] driving ports.
#[derive(Clone)]
pub struct BookingLifecycleService<L> {
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> BookingLifecycleService<L> {
    /// Create the engine over an explicitly constructed ledger.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use hotel_booking::domain::BookingLifecycleService;
    /// # use hotel_booking::outbound::memory::MemoryStore;
    /// # use mockable::DefaultClock;
    /// let engine = BookingLifecycleService::new(Arc::new(MemoryStore::default()), Arc::new(DefaultClock));
    /// # drop(engine);
    /// ```
    pub fn new(ledger: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }
}

impl<L> BookingLifecycleService<L>
where
    L: BookingLedger,
{
    async fn load(&self, booking_id: BookingId) -> Result<Booking, LifecycleError> {
        self.ledger
            .find_booking(booking_id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(LifecycleError::booking_not_found)
    }

    /// Validate `event` against the stored status and apply it atomically.
    async fn advance(
        &self,
        booking_id: BookingId,
        event: LifecycleEvent,
        check_in: Option<NewCheckIn>,
    ) -> Result<(Booking, Option<CheckIn>), LifecycleError> {
        let current = self.load(booking_id).await?;
        let next = current.status.apply(event).map_err(|refused| {
            debug!(%booking_id, status = %current.status, reason = refused.reason(), "transition refused");
            LifecycleError::from(refused)
        })?;

        let transition = StatusTransition {
            booking_id,
            expected: current.status,
            next,
            release_room: event.releases_inventory(),
            check_in,
        };

        match self
            .ledger
            .transition(&transition)
            .await
            .map_err(map_ledger_error)?
        {
            TransitionOutcome::Applied { booking, check_in } => {
                info!(
                    %booking_id,
                    room_id = %booking.room_id,
                    from = %current.status,
                    to = %booking.status,
                    "booking transitioned"
                );
                Ok((booking, check_in))
            }
            TransitionOutcome::BookingNotFound => Err(LifecycleError::booking_not_found()),
            TransitionOutcome::StatusChanged { current } => {
                debug!(%booking_id, status = %current, "lost status race");
                Err(refusal_from(current, event))
            }
        }
    }
}

/// Reason for refusing `event` given the status another request committed.
fn refusal_from(current: BookingStatus, event: LifecycleEvent) -> LifecycleError {
    match current.apply(event) {
        Err(refused) => refused.into(),
        Ok(_) => InvalidTransition {
            from: current,
            event,
        }
        .into(),
    }
}

#[async_trait]
impl<L> BookingLifecycle for BookingLifecycleService<L>
where
    L: BookingLedger,
{
    async fn create_booking(&self, request: BookingRequest) -> Result<Booking, LifecycleError> {
        if request.stay.nights() < 1 {
            return Err(LifecycleError::validation(
                "checkOut",
                "checkOut must be after checkIn",
            ));
        }
        if request.guests.get() < 1 {
            return Err(LifecycleError::validation(
                "guests",
                "guests must be at least 1",
            ));
        }

        let draft = BookingDraft::new(request, self.clock.utc());
        match self
            .ledger
            .reserve(&draft)
            .await
            .map_err(map_ledger_error)?
        {
            Reservation::Reserved(booking) => {
                info!(
                    booking_id = %booking.id,
                    room_id = %booking.room_id,
                    user_id = %booking.user_id,
                    total_amount = booking.total_amount,
                    "booking reserved"
                );
                Ok(booking)
            }
            Reservation::RoomNotFound => Err(LifecycleError::room_not_found()),
            Reservation::HotelMismatch => Err(LifecycleError::validation(
                "roomId",
                "room does not belong to the requested hotel",
            )),
            Reservation::AmountOverflow => Err(LifecycleError::validation(
                "checkOut",
                "total amount exceeds the supported range",
            )),
            Reservation::SoldOut => {
                debug!(room_id = %draft.room_id, "room sold out");
                Err(LifecycleError::NotAvailable)
            }
        }
    }

    async fn cancel_booking(&self, booking_id: BookingId) -> Result<Booking, LifecycleError> {
        let (booking, _) = self
            .advance(booking_id, LifecycleEvent::Cancel, None)
            .await?;
        Ok(booking)
    }

    async fn perform_check_in(&self, request: CheckInRequest) -> Result<CheckIn, LifecycleError> {
        let aadhaar = Aadhaar::new(&request.aadhaar)
            .map_err(|err| LifecycleError::validation("aadhaar", err.to_string()))?;
        let record = NewCheckIn {
            booking_id: request.booking_id,
            aadhaar,
            created_at: self.clock.utc(),
        };

        let (_, check_in) = self
            .advance(request.booking_id, LifecycleEvent::CheckIn, Some(record))
            .await?;
        check_in.ok_or_else(|| LifecycleError::Store {
            message: format!("check-in for booking {} was not recorded", request.booking_id),
            unavailable: false,
        })
    }

    async fn check_out(&self, booking_id: BookingId) -> Result<Booking, LifecycleError> {
        let (booking, _) = self
            .advance(booking_id, LifecycleEvent::CheckOut, None)
            .await?;
        Ok(booking)
    }
}

#[async_trait]
impl<L> BookingQuery for BookingLifecycleService<L>
where
    L: BookingLedger,
{
    async fn bookings_for_user(&self, user_id: UserId) -> Result<Vec<BookingView>, Error> {
        self.ledger
            .bookings_for_user(user_id)
            .await
            .map_err(|err| map_ledger_error(err).into())
    }

    async fn check_ins_for_booking(&self, booking_id: BookingId) -> Result<Vec<CheckIn>, Error> {
        self.ledger
            .check_ins_for_booking(booking_id)
            .await
            .map_err(|err| map_ledger_error(err).into())
    }
}

#[cfg(test)]
#[path = "booking_lifecycle_service_tests.rs"]
mod tests;
