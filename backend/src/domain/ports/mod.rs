//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`BookingLifecycle`, `BookingQuery`, `InventoryCommand`,
//! `InventoryQuery`, `AccountCommand`, `ProfileQuery`, `TokenVerifier`) are
//! called by inbound adapters. Driven ports (`BookingLedger`,
//! `InventoryRepository`, `UserRepository`, `AccessTokenRepository`,
//! `PasswordHasher`, `TokenIssuer`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_repository;
mod account_command;
mod booking_ledger;
mod booking_lifecycle;
mod booking_query;
mod credential_hasher;
mod inventory_command;
mod inventory_query;
mod inventory_repository;
mod user_repository;

#[cfg(test)]
pub use access_token_repository::MockAccessTokenRepository;
pub use access_token_repository::{AccessTokenRepository, AccessTokenRepositoryError};
#[cfg(test)]
pub use account_command::{MockAccountCommand, MockProfileQuery, MockTokenVerifier};
pub use account_command::{AccountCommand, ProfileQuery, TokenVerifier};
#[cfg(test)]
pub use booking_ledger::MockBookingLedger;
pub use booking_ledger::{
    BookingLedger, BookingLedgerError, Reservation, StatusTransition, TransitionOutcome,
};
#[cfg(test)]
pub use booking_lifecycle::MockBookingLifecycle;
pub use booking_lifecycle::BookingLifecycle;
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::BookingQuery;
#[cfg(test)]
pub use credential_hasher::{MockPasswordHasher, MockTokenIssuer};
pub use credential_hasher::{PasswordHasher, TokenIssuer};
#[cfg(test)]
pub use inventory_command::MockInventoryCommand;
pub use inventory_command::InventoryCommand;
#[cfg(test)]
pub use inventory_query::MockInventoryQuery;
pub use inventory_query::InventoryQuery;
#[cfg(test)]
pub use inventory_repository::MockInventoryRepository;
pub use inventory_repository::{InventoryRepository, InventoryRepositoryError, RoomUpdate};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, UserCredentialsRecord, UserPersistenceError, UserRepository};
