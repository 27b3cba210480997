//! Numeric entity identifiers.
//!
//! Every aggregate is keyed by a store-assigned positive 64-bit integer. The
//! newtypes keep a booking id from being passed where a room id is expected.

use std::fmt;

/// Raised when an identifier is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidId {
    kind: &'static str,
    value: i64,
}

impl InvalidId {
    /// Name of the identifier type that rejected the value.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl fmt::Display for InvalidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must be a positive integer, got {}", self.kind, self.value)
    }
}

impl std::error::Error for InvalidId {}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
            utoipa::ToSchema,
        )]
        #[serde(try_from = "i64", into = "i64")]
        #[schema(value_type = i64, example = 1)]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(value: i64) -> Result<Self, InvalidId> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(InvalidId { kind: $kind, value })
                }
            }

            /// Raw integer value.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = InvalidId;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered guest account.
    UserId,
    "userId"
);
define_id!(
    /// Identifier of a hotel.
    HotelId,
    "hotelId"
);
define_id!(
    /// Identifier of a room type at a hotel.
    RoomId,
    "roomId"
);
define_id!(
    /// Identifier of a booking.
    BookingId,
    "bookingId"
);
define_id!(
    /// Identifier of a check-in record.
    CheckInId,
    "checkInId"
);
