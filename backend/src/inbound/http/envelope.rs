//! Success envelope shared by every JSON endpoint.
//!
//! ```text
//! {"success": 1, "data": {...}, "message": "booking created"}
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// Success body wrapping a handler's payload.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T> {
    success: u8,
    data: T,
    message: String,
}

impl<T: Serialize> ApiEnvelope<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            success: 1,
            data,
            message: message.into(),
        }
    }

    fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

/// `200 OK` with `data` wrapped in the envelope.
pub fn ok<T: Serialize>(data: T, message: &str) -> HttpResponse {
    ApiEnvelope::new(data, message).respond(StatusCode::OK)
}

/// `201 Created` with `data` wrapped in the envelope.
pub fn created<T: Serialize>(data: T, message: &str) -> HttpResponse {
    ApiEnvelope::new(data, message).respond(StatusCode::CREATED)
}
