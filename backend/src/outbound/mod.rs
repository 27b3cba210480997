//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: single-mutex in-process store, used when no database is
//!   configured and in tests.
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **crypto**: password hashing and token minting.
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules beyond the atomicity the ports demand.

pub mod crypto;
pub mod memory;
pub mod persistence;
