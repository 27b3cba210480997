//! Failure taxonomy of the booking lifecycle engine.

use serde_json::json;

use crate::domain::{Error, InvalidTransition};

/// Distinguishable failures of the lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Input failed re-validation inside the engine.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    /// The referenced booking or room does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    /// The room has no units left.
    #[error("no available rooms of this type")]
    NotAvailable,
    /// The booking's status does not allow the operation.
    #[error("{0}")]
    InvalidState(InvalidTransition),
    /// The store failed; the message is for logs only.
    #[error("booking store failure: {message}")]
    Store {
        message: String,
        unavailable: bool,
    },
}

impl LifecycleError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn booking_not_found() -> Self {
        Self::NotFound { entity: "booking" }
    }

    pub fn room_not_found() -> Self {
        Self::NotFound { entity: "room" }
    }
}

impl From<InvalidTransition> for LifecycleError {
    fn from(value: InvalidTransition) -> Self {
        Self::InvalidState(value)
    }
}

impl From<LifecycleError> for Error {
    fn from(value: LifecycleError) -> Self {
        match value {
            LifecycleError::Validation { field, message } => {
                Error::invalid_request(message.clone()).with_details(json!({
                    "field": field,
                    "message": message,
                    "code": "invalid_field",
                }))
            }
            LifecycleError::NotFound { entity } => Error::not_found(format!("{entity} not found")),
            LifecycleError::NotAvailable => Error::not_available("no available rooms of this type"),
            LifecycleError::InvalidState(transition) => {
                Error::invalid_state(transition.reason()).with_details(json!({
                    "status": transition.from.as_str(),
                    "operation": transition.event.as_str(),
                }))
            }
            LifecycleError::Store {
                message,
                unavailable: true,
            } => Error::service_unavailable(format!("booking store unavailable: {message}")),
            LifecycleError::Store { message, .. } => {
                Error::internal(format!("booking store error: {message}"))
            }
        }
    }
}
