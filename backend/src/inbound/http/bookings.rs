//! Booking lifecycle handlers.
//!
//! ```text
//! POST   /api/v1/bookings {"userId":1,"hotelId":1,"roomId":1,"checkIn":"2024-01-01","checkOut":"2024-01-04","guests":2}
//! GET    /api/v1/bookings/user/1
//! DELETE /api/v1/bookings/7
//! GET    /api/v1/bookings/check-out/7
//! ```
//!
//! Every state change goes through the [`BookingLifecycle`] port so room
//! availability moves in the same unit of work as the booking status.
//!
//! [`BookingLifecycle`]: crate::domain::ports::BookingLifecycle

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;

use crate::domain::{
    Booking, BookingId, BookingRequest, BookingView, Error, GuestCount, StayDates, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_booking_validation_error, parse_id};

const USER_ID: FieldName = FieldName::new("userId");
const HOTEL_ID: FieldName = FieldName::new("hotelId");
const ROOM_ID: FieldName = FieldName::new("roomId");
const BOOKING_ID: FieldName = FieldName::new("bookingId");

/// Body for `POST /api/v1/bookings`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[schema(example = 1)]
    pub user_id: i64,
    #[schema(example = 1)]
    pub hotel_id: i64,
    #[schema(example = 1)]
    pub room_id: i64,
    #[schema(example = "2024-01-01")]
    pub check_in: String,
    #[schema(example = "2024-01-04")]
    pub check_out: String,
    #[schema(example = 2)]
    pub guests: i64,
}

impl TryFrom<CreateBookingRequest> for BookingRequest {
    type Error = Error;

    fn try_from(value: CreateBookingRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: parse_id(value.user_id, USER_ID)?,
            hotel_id: parse_id(value.hotel_id, HOTEL_ID)?,
            room_id: parse_id(value.room_id, ROOM_ID)?,
            stay: StayDates::parse(&value.check_in, &value.check_out)
                .map_err(map_booking_validation_error)?,
            guests: GuestCount::new(value.guests).map_err(map_booking_validation_error)?,
        })
    }
}

/// Reserve one unit of a room type.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Invalid input or no rooms available", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown room", body = Error),
        (status = 503, description = "Booking store unavailable", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<HttpResponse> {
    let request = BookingRequest::try_from(payload.into_inner())?;
    let booking = state.lifecycle.create_booking(request).await?;
    Ok(created(booking, "booking created"))
}

/// A guest's bookings, newest first, with hotel and room.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/user/{userId}",
    params(("userId" = i64, Path, description = "Guest identifier")),
    responses(
        (status = 200, description = "Bookings", body = [BookingView]),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listUserBookings"
)]
#[get("/bookings/user/{user_id}")]
pub async fn list_user_bookings(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user_id: UserId = parse_id(path.into_inner(), USER_ID)?;
    let bookings = state.bookings.bookings_for_user(user_id).await?;
    Ok(ok(bookings, "bookings fetched"))
}

/// Cancel an upcoming booking and release its room unit.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{bookingId}",
    params(("bookingId" = i64, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 400, description = "Booking is not upcoming", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown booking", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[delete("/bookings/{booking_id}")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let booking_id: BookingId = parse_id(path.into_inner(), BOOKING_ID)?;
    let booking = state.lifecycle.cancel_booking(booking_id).await?;
    Ok(ok(booking, "booking cancelled"))
}

/// Check a guest out and release the room unit.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/check-out/{bookingId}",
    params(("bookingId" = i64, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Checked out", body = Booking),
        (status = 400, description = "Guest is not checked in", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown booking", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "checkOut"
)]
#[get("/bookings/check-out/{booking_id}")]
pub async fn check_out(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let booking_id: BookingId = parse_id(path.into_inner(), BOOKING_ID)?;
    let booking = state.lifecycle.check_out(booking_id).await?;
    Ok(ok(booking, "checked out"))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
