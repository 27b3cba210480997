//! Shared helpers for Diesel repository implementations.
//!
//! Repositories classify Diesel errors once through [`classify_diesel_error`]
//! and then pick the port-specific constructor for each class, so that
//! logging and constraint recognition stay in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Database error reduced to the distinctions ports care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// Connection dropped or was never established.
    Connection(String),
    /// A unique index rejected the write; carries the constraint name.
    UniqueViolation(Option<String>),
    /// A foreign key rejected the write; carries the constraint name.
    ForeignKeyViolation(Option<String>),
    /// Any other failure.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging its driver detail at `debug`.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query("database query error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation(info.constraint_name().map(str::to_owned))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation(info.constraint_name().map(str::to_owned))
        }
        DieselError::DatabaseError(_, _) => DieselFailure::Query("database error".to_owned()),
        _ => DieselFailure::Query("database error".to_owned()),
    }
}

/// Convert a stored integer column into an unsigned domain count.
pub(crate) fn column_to_u32(value: i32, column: &'static str) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("negative {column} in database: {value}"))
}

/// Convert an unsigned domain count into its integer column.
pub(crate) fn u32_to_column(value: u32, column: &'static str) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("{column} exceeds column range: {value}"))
}
