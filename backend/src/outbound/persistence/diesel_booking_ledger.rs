//! PostgreSQL-backed [`BookingLedger`].
//!
//! Each mutating method runs in one transaction. Reservations claim a unit
//! with a guarded `UPDATE rooms SET available = available - 1 WHERE ... AND
//! available > 0`; status changes are `UPDATE bookings SET status = next
//! WHERE id = ? AND status = expected`. PostgreSQL re-checks the predicate
//! after waiting on a concurrent writer's row lock, so at most one contender
//! sees a matching row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{
    BookingLedger, BookingLedgerError, Reservation, StatusTransition, TransitionOutcome,
};
use crate::domain::{
    Booking, BookingDraft, BookingId, BookingStatus, BookingView, CheckIn, Hotel, Room, UserId,
};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, map_pool_error_message, u32_to_column,
};
use super::models::{BookingRow, CheckInRow, HotelRow, NewBookingRow, NewCheckInRow, RoomRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, check_ins, hotels, rooms};

/// Diesel implementation of the booking ledger.
#[derive(Clone)]
pub struct DieselBookingLedger {
    pool: DbPool,
}

impl DieselBookingLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Ways a ledger transaction can end without committing.
#[derive(Debug)]
enum Rollback {
    Diesel(DieselError),
    /// The unit was claimed but the total does not fit; undo the claim.
    AmountOverflow,
    Corrupt(String),
}

impl From<DieselError> for Rollback {
    fn from(error: DieselError) -> Self {
        Rollback::Diesel(error)
    }
}

impl Rollback {
    fn corrupt(error: impl ToString) -> Self {
        Rollback::Corrupt(error.to_string())
    }

    fn into_ledger_error(self) -> BookingLedgerError {
        match self {
            Rollback::Diesel(error) => map_diesel_error(error),
            Rollback::AmountOverflow => BookingLedgerError::query("booking total overflowed"),
            Rollback::Corrupt(message) => {
                warn!(%message, "booking ledger row failed validation");
                BookingLedgerError::query(message)
            }
        }
    }
}

fn map_pool_error(error: PoolError) -> BookingLedgerError {
    BookingLedgerError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> BookingLedgerError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => BookingLedgerError::connection(message),
        DieselFailure::ForeignKeyViolation(constraint) => BookingLedgerError::unknown_reference(
            constraint.unwrap_or_else(|| "foreign key".to_owned()),
        ),
        DieselFailure::UniqueViolation(_) => BookingLedgerError::query("unexpected duplicate row"),
        DieselFailure::Query(message) => BookingLedgerError::query(message),
    }
}

fn parse_status(raw: &str) -> Result<BookingStatus, Rollback> {
    raw.parse::<BookingStatus>().map_err(Rollback::corrupt)
}

async fn reserve_in(
    conn: &mut AsyncPgConnection,
    draft: &BookingDraft,
) -> Result<Reservation, Rollback> {
    let room_id = draft.room_id.get();
    let hotel_id = draft.hotel_id.get();

    let claimed: Option<RoomRow> = diesel::update(
        rooms::table
            .filter(rooms::id.eq(room_id))
            .filter(rooms::hotel_id.eq(hotel_id))
            .filter(rooms::available.gt(0)),
    )
    .set(rooms::available.eq(rooms::available - 1))
    .returning(RoomRow::as_returning())
    .get_result(conn)
    .await
    .optional()?;

    let Some(room) = claimed else {
        let existing: Option<i64> = rooms::table
            .find(room_id)
            .select(rooms::hotel_id)
            .first(conn)
            .await
            .optional()?;
        return Ok(match existing {
            None => Reservation::RoomNotFound,
            Some(owner) if owner != hotel_id => Reservation::HotelMismatch,
            Some(_) => Reservation::SoldOut,
        });
    };

    let Ok(total_amount) = draft.stay.total_for(room.price) else {
        return Err(Rollback::AmountOverflow);
    };
    let row = NewBookingRow {
        user_id: draft.user_id.get(),
        hotel_id,
        room_id,
        check_in: draft.stay.check_in(),
        check_out: draft.stay.check_out(),
        guests: u32_to_column(draft.guests.get(), "guests").map_err(Rollback::Corrupt)?,
        status: BookingStatus::Upcoming.as_str(),
        total_amount,
        created_at: draft.created_at,
    };
    let stored: BookingRow = diesel::insert_into(bookings::table)
        .values(&row)
        .returning(BookingRow::as_returning())
        .get_result(conn)
        .await?;
    Ok(Reservation::Reserved(Booking::try_from(stored).map_err(Rollback::corrupt)?))
}

async fn transition_in(
    conn: &mut AsyncPgConnection,
    transition: &StatusTransition,
) -> Result<TransitionOutcome, Rollback> {
    let booking_id = transition.booking_id.get();

    let updated: Option<BookingRow> = diesel::update(
        bookings::table
            .filter(bookings::id.eq(booking_id))
            .filter(bookings::status.eq(transition.expected.as_str())),
    )
    .set(bookings::status.eq(transition.next.as_str()))
    .returning(BookingRow::as_returning())
    .get_result(conn)
    .await
    .optional()?;

    let Some(row) = updated else {
        let current: Option<String> = bookings::table
            .find(booking_id)
            .select(bookings::status)
            .first(conn)
            .await
            .optional()?;
        return match current {
            None => Ok(TransitionOutcome::BookingNotFound),
            Some(raw) => Ok(TransitionOutcome::StatusChanged {
                current: parse_status(&raw)?,
            }),
        };
    };

    if transition.release_room {
        diesel::update(
            rooms::table
                .filter(rooms::id.eq(row.room_id))
                .filter(rooms::available.lt(rooms::total_rooms)),
        )
        .set(rooms::available.eq(rooms::available + 1))
        .execute(conn)
        .await?;
    }

    let check_in = match &transition.check_in {
        Some(record) => {
            let stored: CheckInRow = diesel::insert_into(check_ins::table)
                .values(&NewCheckInRow {
                    booking_id,
                    aadhaar: record.aadhaar.as_str(),
                    created_at: record.created_at,
                })
                .returning(CheckInRow::as_returning())
                .get_result(conn)
                .await?;
            Some(CheckIn::try_from(stored).map_err(Rollback::corrupt)?)
        }
        None => None,
    };

    Ok(TransitionOutcome::Applied {
        booking: Booking::try_from(row).map_err(Rollback::corrupt)?,
        check_in,
    })
}

fn to_view(
    (booking, hotel, room): (BookingRow, HotelRow, RoomRow),
) -> Result<BookingView, BookingLedgerError> {
    Ok(BookingView {
        booking: Booking::try_from(booking).map_err(BookingLedgerError::query)?,
        hotel: Hotel::try_from(hotel).map_err(BookingLedgerError::query)?,
        room: Room::try_from(room).map_err(BookingLedgerError::query)?,
    })
}

#[async_trait]
impl BookingLedger for DieselBookingLedger {
    async fn reserve(&self, draft: &BookingDraft) -> Result<Reservation, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let result = conn
            .transaction(|conn| async move { reserve_in(conn, draft).await }.scope_boxed())
            .await;
        match result {
            Ok(outcome) => Ok(outcome),
            Err(Rollback::AmountOverflow) => Ok(Reservation::AmountOverflow),
            Err(other) => Err(other.into_ledger_error()),
        }
    }

    async fn transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<TransitionOutcome, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let result = conn
            .transaction(|conn| async move { transition_in(conn, transition).await }.scope_boxed())
            .await;
        result.map_err(Rollback::into_ledger_error)
    }

    async fn find_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BookingRow> = bookings::table
            .find(booking_id.get())
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Booking::try_from)
            .transpose()
            .map_err(BookingLedgerError::query)
    }

    async fn bookings_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BookingView>, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(BookingRow, HotelRow, RoomRow)> = bookings::table
            .inner_join(hotels::table.on(hotels::id.eq(bookings::hotel_id)))
            .inner_join(rooms::table.on(rooms::id.eq(bookings::room_id)))
            .filter(bookings::user_id.eq(user_id.get()))
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .select((
                BookingRow::as_select(),
                HotelRow::as_select(),
                RoomRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_view).collect()
    }

    async fn check_ins_for_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<CheckIn>, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CheckInRow> = check_ins::table
            .filter(check_ins::booking_id.eq(booking_id.get()))
            .order((check_ins::created_at.asc(), check_ins::id.asc()))
            .select(CheckInRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| CheckIn::try_from(row).map_err(BookingLedgerError::query))
            .collect()
    }
}
