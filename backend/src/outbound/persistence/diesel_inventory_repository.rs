//! PostgreSQL-backed [`InventoryRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{InventoryRepository, InventoryRepositoryError, RoomUpdate};
use crate::domain::{
    Hotel, HotelDetails, HotelId, HotelWithRooms, Room, RoomDetails, RoomDraft, RoomId,
};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, map_pool_error_message, u32_to_column,
};
use super::models::{HotelChangeset, HotelRow, NewRoomRow, RoomRow};
use super::pool::{DbPool, PoolError};
use super::schema::{hotels, rooms};

/// Diesel implementation of the inventory repository.
#[derive(Clone)]
pub struct DieselInventoryRepository {
    pool: DbPool,
}

impl DieselInventoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InventoryRepositoryError {
    InventoryRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> InventoryRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => InventoryRepositoryError::connection(message),
        DieselFailure::ForeignKeyViolation(constraint) => InventoryRepositoryError::in_use(
            constraint.unwrap_or_else(|| "referenced by other rows".to_owned()),
        ),
        DieselFailure::UniqueViolation(_) => {
            InventoryRepositoryError::query("unexpected duplicate row")
        }
        DieselFailure::Query(message) => InventoryRepositoryError::query(message),
    }
}

fn to_hotel(row: HotelRow) -> Result<Hotel, InventoryRepositoryError> {
    Hotel::try_from(row).map_err(InventoryRepositoryError::query)
}

fn to_room(row: RoomRow) -> Result<Room, InventoryRepositoryError> {
    Room::try_from(row).map_err(InventoryRepositoryError::query)
}

fn count_column(value: u32, column: &'static str) -> Result<i32, InventoryRepositoryError> {
    u32_to_column(value, column).map_err(InventoryRepositoryError::query)
}

/// Failure inside the resize transaction.
enum ResizeAbort {
    Diesel(DieselError),
    Repository(InventoryRepositoryError),
}

impl From<DieselError> for ResizeAbort {
    fn from(error: DieselError) -> Self {
        ResizeAbort::Diesel(error)
    }
}

impl From<InventoryRepositoryError> for ResizeAbort {
    fn from(error: InventoryRepositoryError) -> Self {
        ResizeAbort::Repository(error)
    }
}

#[async_trait]
impl InventoryRepository for DieselInventoryRepository {
    async fn list_hotels(&self) -> Result<Vec<Hotel>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<HotelRow> = hotels::table
            .order(hotels::id.asc())
            .select(HotelRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_hotel).collect()
    }

    async fn list_hotels_with_rooms(&self) -> Result<Vec<HotelWithRooms>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let hotel_rows: Vec<HotelRow> = hotels::table
            .order(hotels::id.asc())
            .select(HotelRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let room_rows: Vec<RoomRow> = rooms::table
            .order(rooms::id.asc())
            .select(RoomRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rooms = room_rows
            .into_iter()
            .map(to_room)
            .collect::<Result<Vec<_>, _>>()?;
        hotel_rows
            .into_iter()
            .map(|row| {
                let hotel = to_hotel(row)?;
                let rooms = rooms
                    .iter()
                    .filter(|room| room.hotel_id == hotel.id)
                    .cloned()
                    .collect();
                Ok(HotelWithRooms { hotel, rooms })
            })
            .collect()
    }

    async fn insert_hotel(&self, details: &HotelDetails) -> Result<Hotel, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: HotelRow = diesel::insert_into(hotels::table)
            .values(&HotelChangeset {
                name: details.name(),
                location: details.location(),
            })
            .returning(HotelRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_hotel(row)
    }

    async fn update_hotel(
        &self,
        id: HotelId,
        details: &HotelDetails,
    ) -> Result<Option<Hotel>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<HotelRow> = diesel::update(hotels::table.find(id.get()))
            .set(&HotelChangeset {
                name: details.name(),
                location: details.location(),
            })
            .returning(HotelRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_hotel).transpose()
    }

    async fn delete_hotel(&self, id: HotelId) -> Result<bool, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(hotels::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn insert_room(
        &self,
        draft: &RoomDraft,
    ) -> Result<Option<Room>, InventoryRepositoryError> {
        let total = count_column(draft.details.total_rooms(), "total_rooms")?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(rooms::table)
            .values(&NewRoomRow {
                hotel_id: draft.hotel_id.get(),
                room_type: draft.details.room_type(),
                price: draft.details.price(),
                total_rooms: total,
                available: total,
            })
            .returning(RoomRow::as_returning())
            .get_result::<RoomRow>(&mut conn)
            .await;
        match inserted.map_err(classify_diesel_error) {
            Ok(row) => to_room(row).map(Some),
            Err(DieselFailure::ForeignKeyViolation(_)) => Ok(None),
            Err(DieselFailure::Connection(message)) => {
                Err(InventoryRepositoryError::connection(message))
            }
            Err(DieselFailure::UniqueViolation(_)) => {
                Err(InventoryRepositoryError::query("unexpected duplicate row"))
            }
            Err(DieselFailure::Query(message)) => Err(InventoryRepositoryError::query(message)),
        }
    }

    async fn find_room(&self, id: RoomId) -> Result<Option<Room>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RoomRow> = rooms::table
            .find(id.get())
            .select(RoomRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_room).transpose()
    }

    async fn rooms_for_hotel(
        &self,
        hotel_id: HotelId,
    ) -> Result<Vec<Room>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RoomRow> = rooms::table
            .filter(rooms::hotel_id.eq(hotel_id.get()))
            .order(rooms::id.asc())
            .select(RoomRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_room).collect()
    }

    async fn update_room(
        &self,
        id: RoomId,
        details: &RoomDetails,
    ) -> Result<RoomUpdate, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let result: Result<RoomUpdate, ResizeAbort> = conn
            .transaction(|conn| {
                async move {
                    let current: Option<RoomRow> = rooms::table
                        .find(id.get())
                        .select(RoomRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(current) = current else {
                        return Ok(RoomUpdate::NotFound);
                    };
                    let room = to_room(current)?;
                    let available = match room.available_after_resize(details.total_rooms()) {
                        Ok(available) => available,
                        Err(refused) => {
                            return Ok(RoomUpdate::BelowBooked {
                                booked: refused.booked,
                            });
                        }
                    };

                    let row: RoomRow = diesel::update(rooms::table.find(id.get()))
                        .set((
                            rooms::room_type.eq(details.room_type()),
                            rooms::price.eq(details.price()),
                            rooms::total_rooms
                                .eq(count_column(details.total_rooms(), "total_rooms")?),
                            rooms::available.eq(count_column(available, "available")?),
                        ))
                        .returning(RoomRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(RoomUpdate::Updated(to_room(row)?))
                }
                .scope_boxed()
            })
            .await;
        result.map_err(|abort| match abort {
            ResizeAbort::Diesel(error) => map_diesel_error(error),
            ResizeAbort::Repository(error) => error,
        })
    }

    async fn delete_room(&self, id: RoomId) -> Result<bool, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(rooms::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
