//! Driving port for hotel and room administration.

use async_trait::async_trait;

use crate::domain::{Error, Hotel, HotelDetails, HotelId, Room, RoomDetails, RoomDraft, RoomId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryCommand: Send + Sync {
    async fn add_hotel(&self, details: HotelDetails) -> Result<Hotel, Error>;

    async fn update_hotel(&self, id: HotelId, details: HotelDetails) -> Result<Hotel, Error>;

    async fn delete_hotel(&self, id: HotelId) -> Result<(), Error>;

    /// Add a room type; it starts with every unit available.
    async fn add_room(&self, draft: RoomDraft) -> Result<Room, Error>;

    async fn update_room(&self, id: RoomId, details: RoomDetails) -> Result<Room, Error>;

    async fn delete_room(&self, id: RoomId) -> Result<(), Error>;
}
