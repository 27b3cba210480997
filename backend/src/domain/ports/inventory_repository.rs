//! Driven port for hotel and room inventory records.

use async_trait::async_trait;

use crate::domain::{
    Hotel, HotelDetails, HotelId, HotelWithRooms, Room, RoomDetails, RoomDraft, RoomId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by inventory repository adapters.
    pub enum InventoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "inventory repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "inventory repository query failed: {message}",
        /// The record is still referenced by rooms or bookings.
        InUse { message: String } =>
            "inventory record is still referenced: {message}",
    }
}

/// Outcome of re-sizing or editing a room type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomUpdate {
    Updated(Room),
    NotFound,
    /// The new total is below the units currently booked.
    BelowBooked { booked: u32 },
}

/// Port for hotel and room persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn list_hotels(&self) -> Result<Vec<Hotel>, InventoryRepositoryError>;

    /// Every hotel with all of its rooms.
    async fn list_hotels_with_rooms(&self) -> Result<Vec<HotelWithRooms>, InventoryRepositoryError>;

    async fn insert_hotel(&self, details: &HotelDetails) -> Result<Hotel, InventoryRepositoryError>;

    /// Returns `None` when the hotel does not exist.
    async fn update_hotel(
        &self,
        id: HotelId,
        details: &HotelDetails,
    ) -> Result<Option<Hotel>, InventoryRepositoryError>;

    /// Returns `false` when the hotel does not exist.
    async fn delete_hotel(&self, id: HotelId) -> Result<bool, InventoryRepositoryError>;

    /// Insert a room with `available` equal to its total. `None` when the
    /// hotel does not exist.
    async fn insert_room(&self, draft: &RoomDraft)
    -> Result<Option<Room>, InventoryRepositoryError>;

    async fn find_room(&self, id: RoomId) -> Result<Option<Room>, InventoryRepositoryError>;

    async fn rooms_for_hotel(&self, hotel_id: HotelId)
    -> Result<Vec<Room>, InventoryRepositoryError>;

    /// Update a room's attributes, shifting `available` by the change in
    /// total so booked units stay held.
    async fn update_room(
        &self,
        id: RoomId,
        details: &RoomDetails,
    ) -> Result<RoomUpdate, InventoryRepositoryError>;

    /// Returns `false` when the room does not exist.
    async fn delete_room(&self, id: RoomId) -> Result<bool, InventoryRepositoryError>;
}
