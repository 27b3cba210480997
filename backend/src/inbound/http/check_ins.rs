//! Check-in handlers.
//!
//! ```text
//! POST /api/v1/checkin {"bookingId":7,"aadhaar":"123456789012"}
//! GET  /api/v1/checkin/booking/7
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::{Aadhaar, BookingId, CheckIn, CheckInRequest, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_aadhaar_error, parse_id};

const BOOKING_ID: FieldName = FieldName::new("bookingId");

/// Body for `POST /api/v1/checkin`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInBody {
    #[schema(example = 7)]
    pub booking_id: i64,
    #[schema(example = "123456789012")]
    pub aadhaar: String,
}

impl TryFrom<CheckInBody> for CheckInRequest {
    type Error = Error;

    fn try_from(value: CheckInBody) -> Result<Self, Self::Error> {
        let booking_id = parse_id(value.booking_id, BOOKING_ID)?;
        Aadhaar::new(&value.aadhaar).map_err(map_aadhaar_error)?;
        Ok(Self {
            booking_id,
            aadhaar: value.aadhaar,
        })
    }
}

/// Record the guest's identity and mark the booking checked in.
#[utoipa::path(
    post,
    path = "/api/v1/checkin",
    request_body = CheckInBody,
    responses(
        (status = 201, description = "Checked in", body = CheckIn),
        (status = 400, description = "Invalid aadhaar or booking not upcoming", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown booking", body = Error)
    ),
    tags = ["check-ins"],
    operation_id = "checkIn"
)]
#[post("/checkin")]
pub async fn check_in(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    payload: web::Json<CheckInBody>,
) -> ApiResult<HttpResponse> {
    let request = CheckInRequest::try_from(payload.into_inner())?;
    let record = state.lifecycle.perform_check_in(request).await?;
    Ok(created(record, "checked in"))
}

#[utoipa::path(
    get,
    path = "/api/v1/checkin/booking/{bookingId}",
    params(("bookingId" = i64, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Check-in records", body = [CheckIn]),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["check-ins"],
    operation_id = "listCheckIns"
)]
#[get("/checkin/booking/{booking_id}")]
pub async fn list_check_ins(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let booking_id: BookingId = parse_id(path.into_inner(), BOOKING_ID)?;
    let records = state.bookings.check_ins_for_booking(booking_id).await?;
    Ok(ok(records, "check-ins fetched"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(7, "12345678901")]
    #[case(7, "12345678901a")]
    fn malformed_aadhaar_is_rejected_before_the_engine(#[case] id: i64, #[case] aadhaar: &str) {
        let err = CheckInRequest::try_from(CheckInBody {
            booking_id: id,
            aadhaar: aadhaar.to_owned(),
        })
        .expect_err("invalid aadhaar");
        assert_eq!(err.details().expect("details")["field"], "aadhaar");
    }

    #[rstest]
    fn well_formed_body_passes_through() {
        let request = CheckInRequest::try_from(CheckInBody {
            booking_id: 7,
            aadhaar: "123456789012".to_owned(),
        })
        .expect("valid body");
        assert_eq!(request.booking_id.get(), 7);
        assert_eq!(request.aadhaar, "123456789012");
    }
}
