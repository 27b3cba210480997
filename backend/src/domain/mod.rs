//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities for hotels, rooms, bookings,
//! check-ins and guest accounts, the booking lifecycle engine that keeps room
//! availability and booking status consistent, and the ports through which
//! adapters reach them.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `BookingLifecycleService`: the lifecycle engine.
//! - `InventoryService`, `AccountService`: administration and accounts.
//! - `ports`: driving and driven port traits.

pub mod ports;

mod account_service;
mod auth;
mod booking;
mod booking_lifecycle_service;
mod check_in;
mod error;
mod hotel;
mod ids;
mod inventory_service;
mod lifecycle_error;
mod room;
mod trace_id;
mod user;

pub use self::account_service::{
    AccountService, CredentialPrimitives, DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS,
};
pub use self::auth::{
    AccessToken, AuthenticatedSession, LoginCredentials, LoginValidationError, NewPassword,
    PasswordHash, ProfileUpdate, Registration,
};
pub use self::booking::{
    Booking, BookingDraft, BookingRequest, BookingStatus, BookingValidationError, BookingView,
    GuestCount, InvalidTransition, LifecycleEvent, StayDates, UnknownBookingStatus,
    parse_calendar_date,
};
pub use self::booking_lifecycle_service::BookingLifecycleService;
pub use self::check_in::{Aadhaar, CheckIn, CheckInRequest, InvalidAadhaar, NewCheckIn};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::hotel::{Hotel, HotelDetails, HotelValidationError, HotelWithRooms};
pub use self::ids::{BookingId, CheckInId, HotelId, InvalidId, RoomId, UserId};
pub use self::inventory_service::InventoryService;
pub use self::lifecycle_error::LifecycleError;
pub use self::room::{Room, RoomDetails, RoomDraft, RoomResizeError, RoomValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, FullName, PhoneNumber, User, UserValidationError};
