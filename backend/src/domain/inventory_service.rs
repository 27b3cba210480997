//! Hotel and room administration services.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    InventoryCommand, InventoryQuery, InventoryRepository, InventoryRepositoryError, RoomUpdate,
};
use crate::domain::{
    Error, Hotel, HotelDetails, HotelId, HotelWithRooms, Room, RoomDetails, RoomDraft, RoomId,
};

fn map_repository_error(error: InventoryRepositoryError) -> Error {
    match error {
        InventoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("inventory repository unavailable: {message}"))
        }
        InventoryRepositoryError::Query { message } => {
            Error::internal(format!("inventory repository error: {message}"))
        }
        InventoryRepositoryError::InUse { message } => Error::conflict(message),
    }
}

/// Inventory service implementing the inventory driving ports.
#[derive(Clone)]
pub struct InventoryService<R> {
    repo: Arc<R>,
}

impl<R> InventoryService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> InventoryCommand for InventoryService<R>
where
    R: InventoryRepository,
{
    async fn add_hotel(&self, details: HotelDetails) -> Result<Hotel, Error> {
        let hotel = self
            .repo
            .insert_hotel(&details)
            .await
            .map_err(map_repository_error)?;
        info!(hotel_id = %hotel.id, "hotel added");
        Ok(hotel)
    }

    async fn update_hotel(&self, id: HotelId, details: HotelDetails) -> Result<Hotel, Error> {
        self.repo
            .update_hotel(id, &details)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("hotel {id} not found")))
    }

    async fn delete_hotel(&self, id: HotelId) -> Result<(), Error> {
        let deleted = self
            .repo
            .delete_hotel(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("hotel {id} not found")));
        }
        info!(hotel_id = %id, "hotel deleted");
        Ok(())
    }

    async fn add_room(&self, draft: RoomDraft) -> Result<Room, Error> {
        let hotel_id = draft.hotel_id;
        let room = self
            .repo
            .insert_room(&draft)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("hotel {hotel_id} not found")))?;
        info!(room_id = %room.id, %hotel_id, total_rooms = room.total_rooms, "room added");
        Ok(room)
    }

    async fn update_room(&self, id: RoomId, details: RoomDetails) -> Result<Room, Error> {
        match self
            .repo
            .update_room(id, &details)
            .await
            .map_err(map_repository_error)?
        {
            RoomUpdate::Updated(room) => Ok(room),
            RoomUpdate::NotFound => Err(Error::not_found(format!("room {id} not found"))),
            RoomUpdate::BelowBooked { booked } => Err(Error::invalid_state(format!(
                "totalRooms cannot drop below the {booked} rooms currently booked"
            ))
            .with_details(json!({
                "field": "totalRooms",
                "booked": booked,
                "requested": details.total_rooms(),
            }))),
        }
    }

    async fn delete_room(&self, id: RoomId) -> Result<(), Error> {
        let deleted = self
            .repo
            .delete_room(id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("room {id} not found")))
        }
    }
}

#[async_trait]
impl<R> InventoryQuery for InventoryService<R>
where
    R: InventoryRepository,
{
    async fn hotels(&self) -> Result<Vec<Hotel>, Error> {
        self.repo.list_hotels().await.map_err(map_repository_error)
    }

    async fn hotels_with_rooms(&self) -> Result<Vec<HotelWithRooms>, Error> {
        self.repo
            .list_hotels_with_rooms()
            .await
            .map_err(map_repository_error)
    }

    async fn rooms_for_hotel(&self, hotel_id: HotelId) -> Result<Vec<Room>, Error> {
        self.repo
            .rooms_for_hotel(hotel_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockInventoryRepository;
    use rstest::rstest;

    fn details() -> RoomDetails {
        RoomDetails::try_from_parts("Deluxe", 100, 1).expect("valid details")
    }

    fn room_id() -> RoomId {
        RoomId::new(4).expect("valid id")
    }

    #[rstest]
    #[tokio::test]
    async fn shrinking_below_booked_rooms_is_invalid_state() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_update_room()
            .times(1)
            .return_once(|_, _| Ok(RoomUpdate::BelowBooked { booked: 2 }));

        let error = InventoryService::new(Arc::new(repo))
            .update_room(room_id(), details())
            .await
            .expect_err("shrink refused");

        assert_eq!(error.code(), ErrorCode::InvalidState);
        assert_eq!(error.details().and_then(|d| d.get("booked")), Some(&json!(2)));
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_referenced_room_is_conflict() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_delete_room()
            .return_once(|_| Err(InventoryRepositoryError::in_use("room 4 has bookings")));

        let error = InventoryService::new(Arc::new(repo))
            .delete_room(room_id())
            .await
            .expect_err("delete refused");

        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn adding_room_to_unknown_hotel_is_not_found() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_insert_room().return_once(|_| Ok(None));

        let error = InventoryService::new(Arc::new(repo))
            .add_room(RoomDraft {
                hotel_id: HotelId::new(9).expect("valid id"),
                details: details(),
            })
            .await
            .expect_err("unknown hotel");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(InventoryRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(InventoryRepositoryError::query("bad sql"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn listing_maps_repository_failures(
        #[case] failure: InventoryRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockInventoryRepository::new();
        repo.expect_list_hotels_with_rooms()
            .return_once(move || Err(failure));

        let error = InventoryService::new(Arc::new(repo))
            .hotels_with_rooms()
            .await
            .expect_err("listing fails");

        assert_eq!(error.code(), expected);
    }
}
