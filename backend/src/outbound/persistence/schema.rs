//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Guest accounts.
    users (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Digests of issued bearer tokens.
    access_tokens (digest) {
        digest -> Varchar,
        user_id -> Int8,
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    hotels (id) {
        id -> Int8,
        name -> Varchar,
        location -> Varchar,
    }
}

diesel::table! {
    /// Room types per hotel with their availability counter.
    ///
    /// `available` is constrained to `0..=total_rooms` by a CHECK constraint.
    rooms (id) {
        id -> Int8,
        hotel_id -> Int8,
        room_type -> Varchar,
        price -> Int8,
        total_rooms -> Int4,
        available -> Int4,
    }
}

diesel::table! {
    bookings (id) {
        id -> Int8,
        user_id -> Int8,
        hotel_id -> Int8,
        room_id -> Int8,
        check_in -> Date,
        check_out -> Date,
        guests -> Int4,
        /// One of `upcoming`, `checked-in`, `checked-out`, `cancelled`.
        status -> Varchar,
        total_amount -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    check_ins (id) {
        id -> Int8,
        booking_id -> Int8,
        aadhaar -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(access_tokens -> users (user_id));
diesel::joinable!(rooms -> hotels (hotel_id));
diesel::joinable!(bookings -> users (user_id));
diesel::joinable!(bookings -> hotels (hotel_id));
diesel::joinable!(bookings -> rooms (room_id));
diesel::joinable!(check_ins -> bookings (booking_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    access_tokens,
    hotels,
    rooms,
    bookings,
    check_ins,
);
