//! [`BookingLedger`] over the in-memory store.

use async_trait::async_trait;

use super::{MemoryState, MemoryStore, Poisoned, next_id};
use crate::domain::ports::{
    BookingLedger, BookingLedgerError, Reservation, StatusTransition, TransitionOutcome,
};
use crate::domain::{
    Booking, BookingDraft, BookingId, BookingView, CheckIn, CheckInId, UserId,
};

impl From<Poisoned> for BookingLedgerError {
    fn from(_: Poisoned) -> Self {
        BookingLedgerError::query("memory store lock poisoned")
    }
}

fn reserve_locked(
    state: &mut MemoryState,
    draft: &BookingDraft,
) -> Result<Reservation, BookingLedgerError> {
    // Same precedence as the SQL adapter: room, hotel, stock, then guest.
    match state.rooms.get(&draft.room_id) {
        None => return Ok(Reservation::RoomNotFound),
        Some(room) if room.hotel_id != draft.hotel_id => return Ok(Reservation::HotelMismatch),
        Some(room) if room.available == 0 => return Ok(Reservation::SoldOut),
        Some(_) => {}
    }
    if !state.users.contains_key(&draft.user_id) {
        return Err(BookingLedgerError::unknown_reference(format!(
            "user {}",
            draft.user_id
        )));
    }
    let Some(room) = state.rooms.get_mut(&draft.room_id) else {
        return Ok(Reservation::RoomNotFound);
    };

    let id = next_id(&mut state.sequences.bookings, BookingId::new)
        .map_err(|err| BookingLedgerError::query(err.to_string()))?;
    let Ok(booking) = Booking::reserved(id, draft, room.price) else {
        return Ok(Reservation::AmountOverflow);
    };
    room.available -= 1;
    state.bookings.insert(id, booking.clone());
    Ok(Reservation::Reserved(booking))
}

fn transition_locked(
    state: &mut MemoryState,
    transition: &StatusTransition,
) -> Result<TransitionOutcome, BookingLedgerError> {
    let Some(booking) = state.bookings.get_mut(&transition.booking_id) else {
        return Ok(TransitionOutcome::BookingNotFound);
    };
    if booking.status != transition.expected {
        return Ok(TransitionOutcome::StatusChanged {
            current: booking.status,
        });
    }

    if transition.release_room {
        let room = state.rooms.get_mut(&booking.room_id).ok_or_else(|| {
            BookingLedgerError::query(format!(
                "room {} of booking {} is missing",
                booking.room_id, booking.id
            ))
        })?;
        if room.available < room.total_rooms {
            room.available += 1;
        }
    }

    let check_in = match &transition.check_in {
        Some(record) => {
            let id = next_id(&mut state.sequences.check_ins, CheckInId::new)
                .map_err(|err| BookingLedgerError::query(err.to_string()))?;
            let check_in = CheckIn::recorded(id, record.clone());
            state.check_ins.push(check_in.clone());
            Some(check_in)
        }
        None => None,
    };

    booking.status = transition.next;
    Ok(TransitionOutcome::Applied {
        booking: booking.clone(),
        check_in,
    })
}

#[async_trait]
impl BookingLedger for MemoryStore {
    async fn reserve(&self, draft: &BookingDraft) -> Result<Reservation, BookingLedgerError> {
        let mut state = self.lock()?;
        reserve_locked(&mut state, draft)
    }

    async fn transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<TransitionOutcome, BookingLedgerError> {
        let mut state = self.lock()?;
        transition_locked(&mut state, transition)
    }

    async fn find_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, BookingLedgerError> {
        Ok(self.lock()?.bookings.get(&booking_id).cloned())
    }

    async fn bookings_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BookingView>, BookingLedgerError> {
        let state = self.lock()?;
        let mut views = state
            .bookings
            .values()
            .filter(|booking| booking.user_id == user_id)
            .map(|booking| {
                let hotel = state.hotels.get(&booking.hotel_id).cloned();
                let room = state.rooms.get(&booking.room_id).cloned();
                match (hotel, room) {
                    (Some(hotel), Some(room)) => Ok(BookingView {
                        booking: booking.clone(),
                        hotel,
                        room,
                    }),
                    _ => Err(BookingLedgerError::query(format!(
                        "booking {} references missing inventory",
                        booking.id
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        views.sort_by(|a, b| {
            b.booking
                .created_at
                .cmp(&a.booking.created_at)
                .then(b.booking.id.cmp(&a.booking.id))
        });
        Ok(views)
    }

    async fn check_ins_for_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<CheckIn>, BookingLedgerError> {
        Ok(self
            .lock()?
            .check_ins
            .iter()
            .filter(|record| record.booking_id == booking_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{InventoryRepository, NewUser, UserRepository};
    use crate::domain::{
        Aadhaar, BookingStatus, EmailAddress, FullName, GuestCount, HotelDetails, HotelId,
        NewCheckIn, PasswordHash, PhoneNumber, Room, RoomDetails, RoomDraft, RoomId, StayDates,
    };

    struct Seeded {
        store: Arc<MemoryStore>,
        user_id: UserId,
        room: Room,
    }

    #[fixture]
    async fn seeded() -> Seeded {
        let store = Arc::new(MemoryStore::default());
        let user = store
            .insert(&NewUser {
                name: FullName::new("Asha Rao").expect("valid name"),
                email: EmailAddress::new("asha@example.com").expect("valid email"),
                phone: PhoneNumber::new("9876543210").expect("valid phone"),
                password_hash: PasswordHash::from_stored("x$y"),
                created_at: Utc::now(),
            })
            .await
            .expect("user stored");
        let hotel = store
            .insert_hotel(&HotelDetails::try_from_parts("Lakeview", "Udaipur").expect("valid"))
            .await
            .expect("hotel stored");
        let room = store
            .insert_room(&RoomDraft {
                hotel_id: hotel.id,
                details: RoomDetails::try_from_parts("Deluxe", 100, 1).expect("valid"),
            })
            .await
            .expect("room stored")
            .expect("hotel exists");
        Seeded {
            store,
            user_id: user.id,
            room,
        }
    }

    fn draft(seeded: &Seeded, hotel_id: HotelId) -> BookingDraft {
        BookingDraft {
            user_id: seeded.user_id,
            hotel_id,
            room_id: seeded.room.id,
            stay: StayDates::parse("2024-01-01", "2024-01-04").expect("valid stay"),
            guests: GuestCount::new(1).expect("valid guests"),
            created_at: Utc
                .with_ymd_and_hms(2023, 12, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    async fn available(seeded: &Seeded) -> u32 {
        seeded
            .store
            .find_room(seeded.room.id)
            .await
            .expect("lookup")
            .expect("room exists")
            .available
    }

    #[rstest]
    #[tokio::test]
    async fn reserving_last_unit_sells_out(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let first = seeded
            .store
            .reserve(&draft(&seeded, seeded.room.hotel_id))
            .await
            .expect("reserve");
        let second = seeded
            .store
            .reserve(&draft(&seeded, seeded.room.hotel_id))
            .await
            .expect("reserve");

        assert!(matches!(first, Reservation::Reserved(ref b) if b.total_amount == 300));
        assert_eq!(second, Reservation::SoldOut);
        assert_eq!(available(&seeded).await, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn reserving_against_wrong_hotel_changes_nothing(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let other_hotel = HotelId::new(seeded.room.hotel_id.get() + 1).expect("valid id");

        let outcome = seeded
            .store
            .reserve(&draft(&seeded, other_hotel))
            .await
            .expect("reserve");

        assert_eq!(outcome, Reservation::HotelMismatch);
        assert_eq!(available(&seeded).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn stale_expected_status_is_reported_without_writes(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let Reservation::Reserved(booking) = seeded
            .store
            .reserve(&draft(&seeded, seeded.room.hotel_id))
            .await
            .expect("reserve")
        else {
            panic!("reservation expected");
        };

        let outcome = seeded
            .store
            .transition(&StatusTransition {
                booking_id: booking.id,
                expected: BookingStatus::CheckedIn,
                next: BookingStatus::CheckedOut,
                release_room: true,
                check_in: None,
            })
            .await
            .expect("transition");

        assert_eq!(
            outcome,
            TransitionOutcome::StatusChanged {
                current: BookingStatus::Upcoming
            }
        );
        assert_eq!(available(&seeded).await, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn release_is_capped_at_total_rooms(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let Reservation::Reserved(booking) = seeded
            .store
            .reserve(&draft(&seeded, seeded.room.hotel_id))
            .await
            .expect("reserve")
        else {
            panic!("reservation expected");
        };
        {
            let mut state = seeded.store.lock().expect("lock");
            if let Some(room) = state.rooms.get_mut(&seeded.room.id) {
                room.available = room.total_rooms;
            }
        }

        seeded
            .store
            .transition(&StatusTransition {
                booking_id: booking.id,
                expected: BookingStatus::Upcoming,
                next: BookingStatus::Cancelled,
                release_room: true,
                check_in: None,
            })
            .await
            .expect("transition");

        assert_eq!(available(&seeded).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn check_in_record_is_stored_with_status(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let Reservation::Reserved(booking) = seeded
            .store
            .reserve(&draft(&seeded, seeded.room.hotel_id))
            .await
            .expect("reserve")
        else {
            panic!("reservation expected");
        };

        let outcome = seeded
            .store
            .transition(&StatusTransition {
                booking_id: booking.id,
                expected: BookingStatus::Upcoming,
                next: BookingStatus::CheckedIn,
                release_room: false,
                check_in: Some(NewCheckIn {
                    booking_id: booking.id,
                    aadhaar: Aadhaar::new("123456789012").expect("valid aadhaar"),
                    created_at: Utc::now(),
                }),
            })
            .await
            .expect("transition");

        assert!(matches!(outcome, TransitionOutcome::Applied { check_in: Some(_), .. }));
        let records = seeded
            .store
            .check_ins_for_booking(booking.id)
            .await
            .expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(available(&seeded).await, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_guest_is_rejected(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let mut stranger = draft(&seeded, seeded.room.hotel_id);
        stranger.user_id = UserId::new(999).expect("valid id");

        let error = seeded
            .store
            .reserve(&stranger)
            .await
            .expect_err("unknown guest");

        assert!(matches!(error, BookingLedgerError::UnknownReference { .. }));
        assert_eq!(available(&seeded).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_room_wins_over_unknown_guest(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let mut orphan = draft(&seeded, seeded.room.hotel_id);
        orphan.user_id = UserId::new(999).expect("valid id");
        orphan.room_id = RoomId::new(999).expect("valid id");

        let outcome = seeded.store.reserve(&orphan).await.expect("reserve runs");

        assert_eq!(outcome, Reservation::RoomNotFound);
    }
}
