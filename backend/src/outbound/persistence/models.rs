//! Internal Diesel row structs and their conversions to domain types.
//!
//! These types never leave the persistence layer. Conversions out of rows are
//! fallible: a row that violates a domain invariant is reported as a query
//! error rather than trusted.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::{
    Aadhaar, Booking, BookingId, BookingStatus, CheckIn, CheckInId, EmailAddress, FullName, Hotel,
    HotelId, PasswordHash, PhoneNumber, Room, RoomId, User, UserId,
};

use super::diesel_helpers::column_to_u32;
use super::schema::{access_tokens, bookings, check_ins, hotels, rooms, users};

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Partial profile change; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = access_tokens)]
pub(crate) struct NewAccessTokenRow<'a> {
    pub digest: &'a str,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        Ok(self.into_parts()?.0)
    }

    pub(crate) fn into_parts(self) -> Result<(User, PasswordHash), String> {
        let user = User {
            id: UserId::new(self.id).map_err(|err| err.to_string())?,
            name: FullName::new(&self.name).map_err(|err| format!("stored name: {err}"))?,
            email: EmailAddress::new(&self.email).map_err(|err| format!("stored email: {err}"))?,
            phone: PhoneNumber::new(&self.phone).map_err(|err| format!("stored phone: {err}"))?,
            created_at: self.created_at,
        };
        Ok((user, PasswordHash::from_stored(self.password_hash)))
    }
}

// ---------------------------------------------------------------------------
// Hotels and rooms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = hotels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HotelRow {
    pub id: i64,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = hotels)]
pub(crate) struct HotelChangeset<'a> {
    pub name: &'a str,
    pub location: &'a str,
}

impl TryFrom<HotelRow> for Hotel {
    type Error = String;

    fn try_from(row: HotelRow) -> Result<Self, Self::Error> {
        Ok(Hotel {
            id: HotelId::new(row.id).map_err(|err| err.to_string())?,
            name: row.name,
            location: row.location,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoomRow {
    pub id: i64,
    pub hotel_id: i64,
    pub room_type: String,
    pub price: i64,
    pub total_rooms: i32,
    pub available: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rooms)]
pub(crate) struct NewRoomRow<'a> {
    pub hotel_id: i64,
    pub room_type: &'a str,
    pub price: i64,
    pub total_rooms: i32,
    pub available: i32,
}

impl TryFrom<RoomRow> for Room {
    type Error = String;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        let room = Room {
            id: RoomId::new(row.id).map_err(|err| err.to_string())?,
            hotel_id: HotelId::new(row.hotel_id).map_err(|err| err.to_string())?,
            room_type: row.room_type,
            price: row.price,
            total_rooms: column_to_u32(row.total_rooms, "total_rooms")?,
            available: column_to_u32(row.available, "available")?,
        };
        if !room.counter_in_bounds() {
            return Err(format!(
                "room {} has available {} above total {}",
                room.id, room.available, room.total_rooms
            ));
        }
        Ok(room)
    }
}

// ---------------------------------------------------------------------------
// Bookings and check-ins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: i64,
    pub user_id: i64,
    pub hotel_id: i64,
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub status: String,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub user_id: i64,
    pub hotel_id: i64,
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub status: &'a str,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = String;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: BookingId::new(row.id).map_err(|err| err.to_string())?,
            user_id: UserId::new(row.user_id).map_err(|err| err.to_string())?,
            hotel_id: HotelId::new(row.hotel_id).map_err(|err| err.to_string())?,
            room_id: RoomId::new(row.room_id).map_err(|err| err.to_string())?,
            check_in: row.check_in,
            check_out: row.check_out,
            guests: column_to_u32(row.guests, "guests")?,
            status: BookingStatus::from_str(&row.status).map_err(|err| err.to_string())?,
            total_amount: row.total_amount,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = check_ins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CheckInRow {
    pub id: i64,
    pub booking_id: i64,
    pub aadhaar: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = check_ins)]
pub(crate) struct NewCheckInRow<'a> {
    pub booking_id: i64,
    pub aadhaar: &'a str,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CheckInRow> for CheckIn {
    type Error = String;

    fn try_from(row: CheckInRow) -> Result<Self, Self::Error> {
        Ok(CheckIn {
            id: CheckInId::new(row.id).map_err(|err| err.to_string())?,
            booking_id: BookingId::new(row.booking_id).map_err(|err| err.to_string())?,
            aadhaar: Aadhaar::new(&row.aadhaar).map_err(|err| err.to_string())?,
            created_at: row.created_at,
        })
    }
}
