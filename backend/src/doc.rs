//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` handler, the health probes and the
//! domain schemas. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AuthenticatedSession, Booking, BookingStatus, BookingView, CheckIn, Error, ErrorCode, Hotel,
    HotelWithRooms, Room, User,
};
use crate::inbound::http::{bookings, check_ins, health, hotels, rooms, users};

/// Register the bearer token scheme issued by `POST /api/v1/auth/login`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.description = Some("Opaque token issued by POST /api/v1/auth/login.".to_owned());
        components.add_security_scheme("BearerToken", SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Hotel booking API",
        description = "Guest accounts, hotel inventory and the booking lifecycle."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        users::register,
        users::login,
        users::get_profile,
        users::update_profile,
        hotels::list_hotels,
        hotels::list_hotels_with_rooms,
        hotels::add_hotel,
        hotels::update_hotel,
        hotels::delete_hotel,
        rooms::add_room,
        rooms::list_rooms,
        rooms::update_room,
        rooms::delete_room,
        bookings::create_booking,
        bookings::list_user_bookings,
        bookings::cancel_booking,
        bookings::check_out,
        check_ins::check_in,
        check_ins::list_check_ins,
        health::ready,
        health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        AuthenticatedSession,
        Hotel,
        HotelWithRooms,
        Room,
        Booking,
        BookingStatus,
        BookingView,
        CheckIn,
        users::RegisterRequest,
        users::LoginRequest,
        users::ProfileUpdateRequest,
        hotels::HotelRequest,
        rooms::NewRoomRequest,
        rooms::RoomRequest,
        bookings::CreateBookingRequest,
        check_ins::CheckInBody,
    )),
    tags(
        (name = "auth", description = "Guest registration, login and profiles"),
        (name = "hotels", description = "Hotel administration"),
        (name = "rooms", description = "Room types and availability"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "check-ins", description = "Guest check-in records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
