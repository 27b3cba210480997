//! Driving port for hotel and room listings.

use async_trait::async_trait;

use crate::domain::{Error, Hotel, HotelId, HotelWithRooms, Room};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryQuery: Send + Sync {
    async fn hotels(&self) -> Result<Vec<Hotel>, Error>;

    async fn hotels_with_rooms(&self) -> Result<Vec<HotelWithRooms>, Error>;

    async fn rooms_for_hotel(&self, hotel_id: HotelId) -> Result<Vec<Room>, Error>;
}
