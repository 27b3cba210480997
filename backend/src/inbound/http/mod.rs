//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate JSON payloads into validated domain inputs, call a
//! driving port from [`state::HttpState`] and wrap the result in the shared
//! success envelope. Failures render through [`error`].

use actix_web::web;

pub mod auth;
pub mod bookings;
pub mod check_ins;
pub mod envelope;
pub mod error;
pub mod health;
pub mod hotels;
pub mod rooms;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on a scope or app.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use hotel_booking::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::get_profile)
        .service(users::update_profile)
        .service(hotels::list_hotels_with_rooms)
        .service(hotels::list_hotels)
        .service(hotels::add_hotel)
        .service(hotels::update_hotel)
        .service(hotels::delete_hotel)
        .service(rooms::add_room)
        .service(rooms::list_rooms)
        .service(rooms::update_room)
        .service(rooms::delete_room)
        .service(bookings::create_booking)
        .service(bookings::list_user_bookings)
        .service(bookings::check_out)
        .service(bookings::cancel_booking)
        .service(check_ins::check_in)
        .service(check_ins::list_check_ins);
}
