//! Room type handlers.
//!
//! ```text
//! POST   /api/v1/rooms {"hotelId":1,"roomType":"Deluxe","price":100,"totalRooms":2}
//! GET    /api/v1/rooms/1
//! PUT    /api/v1/rooms/4 {"roomType":"Deluxe","price":120,"totalRooms":3}
//! DELETE /api/v1/rooms/4
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::{Error, HotelId, Room, RoomDetails, RoomDraft, RoomId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_room_validation_error, parse_id};

const HOTEL_ID: FieldName = FieldName::new("hotelId");
const ROOM_ID: FieldName = FieldName::new("roomId");

/// Body for `POST /api/v1/rooms`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRoomRequest {
    #[schema(example = 1)]
    pub hotel_id: i64,
    #[serde(flatten)]
    pub details: RoomRequest,
}

/// Room attributes for create and update.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    #[schema(example = "Deluxe")]
    pub room_type: String,
    #[schema(example = 100)]
    pub price: i64,
    #[schema(example = 2)]
    pub total_rooms: i64,
}

impl TryFrom<RoomRequest> for RoomDetails {
    type Error = Error;

    fn try_from(value: RoomRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.room_type, value.price, value.total_rooms)
            .map_err(map_room_validation_error)
    }
}

impl TryFrom<NewRoomRequest> for RoomDraft {
    type Error = Error;

    fn try_from(value: NewRoomRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            hotel_id: parse_id(value.hotel_id, HOTEL_ID)?,
            details: RoomDetails::try_from(value.details)?,
        })
    }
}

/// Add a room type; every unit starts available.
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    request_body = NewRoomRequest,
    responses(
        (status = 201, description = "Room added", body = Room),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown hotel", body = Error)
    ),
    tags = ["rooms"],
    operation_id = "addRoom"
)]
#[post("/rooms")]
pub async fn add_room(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    payload: web::Json<NewRoomRequest>,
) -> ApiResult<HttpResponse> {
    let draft = RoomDraft::try_from(payload.into_inner())?;
    let room = state.inventory.add_room(draft).await?;
    Ok(created(room, "room added"))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{hotelId}",
    params(("hotelId" = i64, Path, description = "Hotel identifier")),
    responses(
        (status = 200, description = "Rooms of the hotel", body = [Room]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rooms"],
    operation_id = "listRooms",
    security([])
)]
#[get("/rooms/{hotel_id}")]
pub async fn list_rooms(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let hotel_id: HotelId = parse_id(path.into_inner(), HOTEL_ID)?;
    let rooms = state.inventory_query.rooms_for_hotel(hotel_id).await?;
    Ok(ok(rooms, "rooms fetched"))
}

/// Update a room type. Resizing shifts availability by the same delta.
#[utoipa::path(
    put,
    path = "/api/v1/rooms/{roomId}",
    params(("roomId" = i64, Path, description = "Room identifier")),
    request_body = RoomRequest,
    responses(
        (status = 200, description = "Room updated", body = Room),
        (status = 400, description = "Invalid input or fewer rooms than booked", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown room", body = Error)
    ),
    tags = ["rooms"],
    operation_id = "updateRoom"
)]
#[put("/rooms/{room_id}")]
pub async fn update_room(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<RoomRequest>,
) -> ApiResult<HttpResponse> {
    let room_id: RoomId = parse_id(path.into_inner(), ROOM_ID)?;
    let details = RoomDetails::try_from(payload.into_inner())?;
    let room = state.inventory.update_room(room_id, details).await?;
    Ok(ok(room, "room updated"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{roomId}",
    params(("roomId" = i64, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Room deleted"),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown room", body = Error),
        (status = 409, description = "Bookings reference the room", body = Error)
    ),
    tags = ["rooms"],
    operation_id = "deleteRoom"
)]
#[delete("/rooms/{room_id}")]
pub async fn delete_room(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let room_id: RoomId = parse_id(path.into_inner(), ROOM_ID)?;
    state.inventory.delete_room(room_id).await?;
    Ok(ok((), "room deleted"))
}
