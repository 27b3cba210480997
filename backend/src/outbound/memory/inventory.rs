//! [`InventoryRepository`] over the in-memory store.

use async_trait::async_trait;

use super::{MemoryStore, Poisoned, next_id};
use crate::domain::ports::{InventoryRepository, InventoryRepositoryError, RoomUpdate};
use crate::domain::{
    Hotel, HotelDetails, HotelId, HotelWithRooms, Room, RoomDetails, RoomDraft, RoomId,
};

impl From<Poisoned> for InventoryRepositoryError {
    fn from(_: Poisoned) -> Self {
        InventoryRepositoryError::query("memory store lock poisoned")
    }
}

#[async_trait]
impl InventoryRepository for MemoryStore {
    async fn list_hotels(&self) -> Result<Vec<Hotel>, InventoryRepositoryError> {
        Ok(self.lock()?.hotels.values().cloned().collect())
    }

    async fn list_hotels_with_rooms(&self) -> Result<Vec<HotelWithRooms>, InventoryRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .hotels
            .values()
            .map(|hotel| HotelWithRooms {
                hotel: hotel.clone(),
                rooms: state
                    .rooms
                    .values()
                    .filter(|room| room.hotel_id == hotel.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn insert_hotel(&self, details: &HotelDetails) -> Result<Hotel, InventoryRepositoryError> {
        let mut state = self.lock()?;
        let id = next_id(&mut state.sequences.hotels, HotelId::new)
            .map_err(|err| InventoryRepositoryError::query(err.to_string()))?;
        let hotel = Hotel::new(id, details.clone());
        state.hotels.insert(id, hotel.clone());
        Ok(hotel)
    }

    async fn update_hotel(
        &self,
        id: HotelId,
        details: &HotelDetails,
    ) -> Result<Option<Hotel>, InventoryRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.hotels.get_mut(&id).map(|hotel| {
            *hotel = Hotel::new(id, details.clone());
            hotel.clone()
        }))
    }

    async fn delete_hotel(&self, id: HotelId) -> Result<bool, InventoryRepositoryError> {
        let mut state = self.lock()?;
        if !state.hotels.contains_key(&id) {
            return Ok(false);
        }
        let referenced = state.rooms.values().any(|room| room.hotel_id == id)
            || state.bookings.values().any(|booking| booking.hotel_id == id);
        if referenced {
            return Err(InventoryRepositoryError::in_use(format!(
                "hotel {id} still has rooms or bookings"
            )));
        }
        state.hotels.remove(&id);
        Ok(true)
    }

    async fn insert_room(
        &self,
        draft: &RoomDraft,
    ) -> Result<Option<Room>, InventoryRepositoryError> {
        let mut state = self.lock()?;
        if !state.hotels.contains_key(&draft.hotel_id) {
            return Ok(None);
        }
        let id = next_id(&mut state.sequences.rooms, RoomId::new)
            .map_err(|err| InventoryRepositoryError::query(err.to_string()))?;
        let room = Room {
            id,
            hotel_id: draft.hotel_id,
            room_type: draft.details.room_type().to_owned(),
            price: draft.details.price(),
            total_rooms: draft.details.total_rooms(),
            available: draft.details.total_rooms(),
        };
        state.rooms.insert(id, room.clone());
        Ok(Some(room))
    }

    async fn find_room(&self, id: RoomId) -> Result<Option<Room>, InventoryRepositoryError> {
        Ok(self.lock()?.rooms.get(&id).cloned())
    }

    async fn rooms_for_hotel(
        &self,
        hotel_id: HotelId,
    ) -> Result<Vec<Room>, InventoryRepositoryError> {
        Ok(self
            .lock()?
            .rooms
            .values()
            .filter(|room| room.hotel_id == hotel_id)
            .cloned()
            .collect())
    }

    async fn update_room(
        &self,
        id: RoomId,
        details: &RoomDetails,
    ) -> Result<RoomUpdate, InventoryRepositoryError> {
        let mut state = self.lock()?;
        let Some(room) = state.rooms.get_mut(&id) else {
            return Ok(RoomUpdate::NotFound);
        };
        let available = match room.available_after_resize(details.total_rooms()) {
            Ok(available) => available,
            Err(refused) => {
                return Ok(RoomUpdate::BelowBooked {
                    booked: refused.booked,
                });
            }
        };
        room.room_type = details.room_type().to_owned();
        room.price = details.price();
        room.total_rooms = details.total_rooms();
        room.available = available;
        Ok(RoomUpdate::Updated(room.clone()))
    }

    async fn delete_room(&self, id: RoomId) -> Result<bool, InventoryRepositoryError> {
        let mut state = self.lock()?;
        if !state.rooms.contains_key(&id) {
            return Ok(false);
        }
        if state.bookings.values().any(|booking| booking.room_id == id) {
            return Err(InventoryRepositoryError::in_use(format!(
                "room {id} still has bookings"
            )));
        }
        state.rooms.remove(&id);
        Ok(true)
    }
}
