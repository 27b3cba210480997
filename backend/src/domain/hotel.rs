//! Hotel aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{HotelId, Room};

const TEXT_MIN: usize = 3;
const TEXT_MAX: usize = 100;

/// Validation errors for hotel details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotelValidationError {
    NameLength,
    LocationLength,
}

impl HotelValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameLength => "name",
            Self::LocationLength => "location",
        }
    }
}

impl fmt::Display for HotelValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must be between {TEXT_MIN} and {TEXT_MAX} characters",
            self.field()
        )
    }
}

impl std::error::Error for HotelValidationError {}

/// Editable hotel attributes.
///
/// ## Invariants
/// - `name` and `location` are trimmed and 3 to 100 characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelDetails {
    name: String,
    location: String,
}

impl HotelDetails {
    pub fn try_from_parts(name: &str, location: &str) -> Result<Self, HotelValidationError> {
        let name = bounded(name).ok_or(HotelValidationError::NameLength)?;
        let location = bounded(location).ok_or(HotelValidationError::LocationLength)?;
        Ok(Self { name, location })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

fn bounded(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (TEXT_MIN..=TEXT_MAX)
        .contains(&trimmed.chars().count())
        .then(|| trimmed.to_owned())
}

/// Persisted hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: HotelId,
    #[schema(example = "Lakeview Residency")]
    pub name: String,
    #[schema(example = "Udaipur")]
    pub location: String,
}

impl Hotel {
    pub fn new(id: HotelId, details: HotelDetails) -> Self {
        Self {
            id,
            name: details.name,
            location: details.location,
        }
    }
}

/// Hotel together with all of its room types.
///
/// Available-room totals are left to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelWithRooms {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub rooms: Vec<Room>,
}
