//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows (`models.rs`,
//! `schema.rs`) and domain types; row structs never leave this module.
//! Connections come from a `bb8` pool of `diesel-async` connections, and the
//! schema is applied from embedded migrations at start-up.
//!
//! ```ignore
//! use hotel_booking::outbound::persistence::{DbPool, DieselBookingLedger, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/hotel")).await?;
//! let ledger = DieselBookingLedger::new(pool);
//! ```

mod diesel_booking_ledger;
mod diesel_helpers;
mod diesel_inventory_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_booking_ledger::DieselBookingLedger;
pub use diesel_inventory_repository::DieselInventoryRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
