//! Driving port for read-only booking projections.

use async_trait::async_trait;

use crate::domain::{BookingId, BookingView, CheckIn, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// A guest's bookings joined with hotel and room.
    async fn bookings_for_user(&self, user_id: UserId) -> Result<Vec<BookingView>, Error>;

    /// Check-in records of one booking.
    async fn check_ins_for_booking(&self, booking_id: BookingId) -> Result<Vec<CheckIn>, Error>;
}
