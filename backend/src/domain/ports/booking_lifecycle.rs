//! Driving port for the booking lifecycle operations.
//!
//! Inbound adapters call this port to create, cancel, check in and check out
//! bookings. Failures are typed so adapters can map each kind to a distinct
//! response.

use async_trait::async_trait;

use crate::domain::{Booking, BookingId, BookingRequest, CheckIn, CheckInRequest, LifecycleError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingLifecycle: Send + Sync {
    /// Claim a room unit and store an upcoming booking.
    async fn create_booking(&self, request: BookingRequest) -> Result<Booking, LifecycleError>;

    /// Cancel an upcoming booking and release its room unit.
    async fn cancel_booking(&self, booking_id: BookingId) -> Result<Booking, LifecycleError>;

    /// Record the guest's identity and mark the booking checked in.
    async fn perform_check_in(&self, request: CheckInRequest) -> Result<CheckIn, LifecycleError>;

    /// Mark a checked-in booking checked out and release its room unit.
    async fn check_out(&self, booking_id: BookingId) -> Result<Booking, LifecycleError>;
}
