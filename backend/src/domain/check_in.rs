//! Guest check-in records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingId, CheckInId};

const AADHAAR_DIGITS: usize = 12;

/// Raised when an identity number is not exactly twelve ASCII digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAadhaar;

impl fmt::Display for InvalidAadhaar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aadhaar must be exactly {AADHAAR_DIGITS} digits")
    }
}

impl std::error::Error for InvalidAadhaar {}

/// Twelve-digit national identity number presented at check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "123456789012")]
pub struct Aadhaar(String);

impl Aadhaar {
    /// # Examples
    /// ```
    /// use hotel_booking::domain::Aadhaar;
    ///
    /// assert!(Aadhaar::new("123456789012").is_ok());
    /// assert!(Aadhaar::new("12345678901").is_err());
    /// assert!(Aadhaar::new("12345678901a").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, InvalidAadhaar> {
        if raw.len() == AADHAAR_DIGITS && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(InvalidAadhaar)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Aadhaar {
    type Error = InvalidAadhaar;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Aadhaar> for String {
    fn from(value: Aadhaar) -> Self {
        value.0
    }
}

/// Typed input for a check-in.
///
/// `aadhaar` is kept as received; the lifecycle service re-validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInRequest {
    pub booking_id: BookingId,
    pub aadhaar: String,
}

/// Check-in record awaiting insertion alongside the status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckIn {
    pub booking_id: BookingId,
    pub aadhaar: Aadhaar,
    pub created_at: DateTime<Utc>,
}

/// Immutable proof-of-identity record tied to one booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: CheckInId,
    pub booking_id: BookingId,
    pub aadhaar: Aadhaar,
    pub created_at: DateTime<Utc>,
}

impl CheckIn {
    pub fn recorded(id: CheckInId, record: NewCheckIn) -> Self {
        Self {
            id,
            booking_id: record.booking_id,
            aadhaar: record.aadhaar,
            created_at: record.created_at,
        }
    }
}
