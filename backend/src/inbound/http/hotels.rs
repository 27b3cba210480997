//! Hotel administration and listing handlers.
//!
//! ```text
//! GET    /api/v1/hotels
//! GET    /api/v1/hotels/get-all
//! POST   /api/v1/hotels {"name":"Lakeview","location":"Udaipur"}
//! PUT    /api/v1/hotels/3 {"name":"Lakeview Grand","location":"Udaipur"}
//! DELETE /api/v1/hotels/3
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::{Error, Hotel, HotelDetails, HotelId, HotelWithRooms};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_hotel_validation_error, parse_id};

const HOTEL_ID: FieldName = FieldName::new("hotelId");

/// Hotel body for create and update.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelRequest {
    #[schema(example = "Lakeview Residency")]
    pub name: String,
    #[schema(example = "Udaipur")]
    pub location: String,
}

impl TryFrom<HotelRequest> for HotelDetails {
    type Error = Error;

    fn try_from(value: HotelRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.location).map_err(map_hotel_validation_error)
    }
}

/// List hotels.
#[utoipa::path(
    get,
    path = "/api/v1/hotels",
    responses(
        (status = 200, description = "Hotels", body = [Hotel]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["hotels"],
    operation_id = "listHotels",
    security([])
)]
#[get("/hotels")]
pub async fn list_hotels(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let hotels = state.inventory_query.hotels().await?;
    Ok(ok(hotels, "hotels fetched"))
}

/// List hotels together with their room types.
#[utoipa::path(
    get,
    path = "/api/v1/hotels/get-all",
    responses(
        (status = 200, description = "Hotels with rooms", body = [HotelWithRooms]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["hotels"],
    operation_id = "listHotelsWithRooms",
    security([])
)]
#[get("/hotels/get-all")]
pub async fn list_hotels_with_rooms(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let hotels = state.inventory_query.hotels_with_rooms().await?;
    Ok(ok(hotels, "hotels fetched"))
}

#[utoipa::path(
    post,
    path = "/api/v1/hotels",
    request_body = HotelRequest,
    responses(
        (status = 201, description = "Hotel added", body = Hotel),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["hotels"],
    operation_id = "addHotel"
)]
#[post("/hotels")]
pub async fn add_hotel(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    payload: web::Json<HotelRequest>,
) -> ApiResult<HttpResponse> {
    let details = HotelDetails::try_from(payload.into_inner())?;
    let hotel = state.inventory.add_hotel(details).await?;
    Ok(created(hotel, "hotel added"))
}

#[utoipa::path(
    put,
    path = "/api/v1/hotels/{hotelId}",
    params(("hotelId" = i64, Path, description = "Hotel identifier")),
    request_body = HotelRequest,
    responses(
        (status = 200, description = "Hotel updated", body = Hotel),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown hotel", body = Error)
    ),
    tags = ["hotels"],
    operation_id = "updateHotel"
)]
#[put("/hotels/{hotel_id}")]
pub async fn update_hotel(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<HotelRequest>,
) -> ApiResult<HttpResponse> {
    let hotel_id: HotelId = parse_id(path.into_inner(), HOTEL_ID)?;
    let details = HotelDetails::try_from(payload.into_inner())?;
    let hotel = state.inventory.update_hotel(hotel_id, details).await?;
    Ok(ok(hotel, "hotel updated"))
}

/// Delete a hotel that no room or booking references.
#[utoipa::path(
    delete,
    path = "/api/v1/hotels/{hotelId}",
    params(("hotelId" = i64, Path, description = "Hotel identifier")),
    responses(
        (status = 200, description = "Hotel deleted"),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown hotel", body = Error),
        (status = 409, description = "Rooms or bookings reference the hotel", body = Error)
    ),
    tags = ["hotels"],
    operation_id = "deleteHotel"
)]
#[delete("/hotels/{hotel_id}")]
pub async fn delete_hotel(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let hotel_id: HotelId = parse_id(path.into_inner(), HOTEL_ID)?;
    state.inventory.delete_hotel(hotel_id).await?;
    Ok(ok((), "hotel deleted"))
}
