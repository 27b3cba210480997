//! Room inventory model.
//!
//! A [`Room`] is a room *type* at a hotel with a pool of identical units.
//! `available` counts the units not held by an active booking and always
//! satisfies `0 <= available <= total_rooms`.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{HotelId, RoomId};

const ROOM_TYPE_MIN: usize = 3;
const ROOM_TYPE_MAX: usize = 50;

/// Validation errors for room attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomValidationError {
    RoomTypeLength,
    NonPositivePrice,
    NoRooms,
}

impl RoomValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::RoomTypeLength => "roomType",
            Self::NonPositivePrice => "price",
            Self::NoRooms => "totalRooms",
        }
    }
}

impl fmt::Display for RoomValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoomTypeLength => write!(
                f,
                "roomType must be between {ROOM_TYPE_MIN} and {ROOM_TYPE_MAX} characters"
            ),
            Self::NonPositivePrice => write!(f, "price must be a positive amount"),
            Self::NoRooms => write!(f, "totalRooms must be at least 1"),
        }
    }
}

impl std::error::Error for RoomValidationError {}

/// Editable attributes of a room type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetails {
    room_type: String,
    price: i64,
    total_rooms: u32,
}

impl RoomDetails {
    /// Validate raw attributes.
    ///
    /// # Examples
    /// ```
    /// use hotel_booking::domain::RoomDetails;
    ///
    /// let details = RoomDetails::try_from_parts("Deluxe", 100, 2).unwrap();
    /// assert_eq!(details.total_rooms(), 2);
    /// assert!(RoomDetails::try_from_parts("Deluxe", 0, 2).is_err());
    /// ```
    pub fn try_from_parts(
        room_type: &str,
        price: i64,
        total_rooms: i64,
    ) -> Result<Self, RoomValidationError> {
        let trimmed = room_type.trim();
        if !(ROOM_TYPE_MIN..=ROOM_TYPE_MAX).contains(&trimmed.chars().count()) {
            return Err(RoomValidationError::RoomTypeLength);
        }
        if price <= 0 {
            return Err(RoomValidationError::NonPositivePrice);
        }
        let total_rooms = u32::try_from(total_rooms)
            .ok()
            .filter(|total| *total >= 1)
            .ok_or(RoomValidationError::NoRooms)?;
        Ok(Self {
            room_type: trimmed.to_owned(),
            price,
            total_rooms,
        })
    }

    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn total_rooms(&self) -> u32 {
        self.total_rooms
    }
}

/// New room type to be added to a hotel; starts fully available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDraft {
    pub hotel_id: HotelId,
    pub details: RoomDetails,
}

/// Persisted room type with its live availability counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub hotel_id: HotelId,
    #[schema(example = "Deluxe")]
    pub room_type: String,
    /// Nightly rate in whole currency units.
    #[schema(example = 100)]
    pub price: i64,
    #[schema(example = 2)]
    pub total_rooms: u32,
    #[schema(example = 2)]
    pub available: u32,
}

/// Raised when shrinking a room type below the units currently booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomResizeError {
    pub booked: u32,
    pub requested: u32,
}

impl fmt::Display for RoomResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "totalRooms cannot drop to {} while {} rooms are booked",
            self.requested, self.booked
        )
    }
}

impl std::error::Error for RoomResizeError {}

impl Room {
    /// Units currently held by bookings.
    pub fn booked(&self) -> u32 {
        self.total_rooms.saturating_sub(self.available)
    }

    /// Whether the availability counter is within bounds.
    pub fn counter_in_bounds(&self) -> bool {
        self.available <= self.total_rooms
    }

    /// Availability after changing the pool size, keeping booked units held.
    pub fn available_after_resize(&self, new_total: u32) -> Result<u32, RoomResizeError> {
        let booked = self.booked();
        new_total.checked_sub(booked).ok_or(RoomResizeError {
            booked,
            requested: new_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn room() -> Room {
        Room {
            id: RoomId::new(1).expect("valid id"),
            hotel_id: HotelId::new(1).expect("valid id"),
            room_type: "Deluxe".to_owned(),
            price: 100,
            total_rooms: 5,
            available: 2,
        }
    }

    #[rstest]
    #[case("Sui", 100, 1, None)]
    #[case("Su", 100, 1, Some(RoomValidationError::RoomTypeLength))]
    #[case("Suite", -1, 1, Some(RoomValidationError::NonPositivePrice))]
    #[case("Suite", 100, 0, Some(RoomValidationError::NoRooms))]
    #[case("Suite", 100, -3, Some(RoomValidationError::NoRooms))]
    fn validates_details(
        #[case] room_type: &str,
        #[case] price: i64,
        #[case] total: i64,
        #[case] expected: Option<RoomValidationError>,
    ) {
        assert_eq!(
            RoomDetails::try_from_parts(room_type, price, total).err(),
            expected
        );
    }

    #[rstest]
    #[case(8, Ok(5))]
    #[case(3, Ok(0))]
    #[case(2, Err(RoomResizeError { booked: 3, requested: 2 }))]
    fn resizing_keeps_booked_units(
        room: Room,
        #[case] new_total: u32,
        #[case] expected: Result<u32, RoomResizeError>,
    ) {
        assert_eq!(room.available_after_resize(new_total), expected);
    }
}
