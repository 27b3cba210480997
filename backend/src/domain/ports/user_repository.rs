//! Port abstraction for guest account persistence and its errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    EmailAddress, FullName, PasswordHash, PhoneNumber, ProfileUpdate, User, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Account awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: FullName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

/// Stored account including its password hash, for credential checks only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentialsRecord {
    pub user: User,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account, failing with `DuplicateEmail` if the email is taken.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch an account and its password hash by login email.
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Apply a partial update; `None` when the user does not exist.
    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError>;
}
