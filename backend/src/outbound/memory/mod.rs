//! In-process store implementing every driven persistence port.
//!
//! All state sits behind one mutex, so each port method runs as a single
//! critical section: the availability check and the counter change in a
//! reservation, or the status compare-and-swap and its side effects in a
//! transition, can never interleave with another request. The lock is never
//! held across an `.await`.
//!
//! Used when no database is configured and as the backing store in tests.

mod accounts;
mod inventory;
mod ledger;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::domain::{
    Booking, CheckIn, Hotel, HotelId, InvalidId, PasswordHash, Room, RoomId, User, UserId,
    BookingId,
};

/// Shared in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    sequences: Sequences,
    users: BTreeMap<UserId, StoredUser>,
    tokens: HashMap<String, StoredToken>,
    hotels: BTreeMap<HotelId, Hotel>,
    rooms: BTreeMap<RoomId, Room>,
    bookings: BTreeMap<BookingId, Booking>,
    check_ins: Vec<CheckIn>,
}

#[derive(Debug)]
struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

#[derive(Debug, Clone, Copy)]
struct StoredToken {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

/// Monotonic id counters, one per table.
#[derive(Debug, Default)]
struct Sequences {
    users: i64,
    hotels: i64,
    rooms: i64,
    bookings: i64,
    check_ins: i64,
}

fn next_id<T>(counter: &mut i64, wrap: fn(i64) -> Result<T, InvalidId>) -> Result<T, InvalidId> {
    *counter += 1;
    wrap(*counter)
}

/// The mutex was poisoned by a panicking writer.
#[derive(Debug, Clone, Copy)]
struct Poisoned;

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, Poisoned> {
        self.state.lock().map_err(|_| Poisoned)
    }
}
