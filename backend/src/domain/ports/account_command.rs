//! Driving ports for guest accounts and bearer authentication.
//!
//! In hexagonal terms these are *driving* ports: inbound adapters call them
//! without knowing how passwords are hashed or where tokens live, so handler
//! tests can run against in-memory adapters.

use async_trait::async_trait;

use crate::domain::{
    AuthenticatedSession, Error, LoginCredentials, ProfileUpdate, Registration, User, UserId,
};

/// Registration, login and profile edits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account; duplicate emails are rejected.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and issue a bearer token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedSession, Error>;

    async fn update_profile(&self, user_id: UserId, update: ProfileUpdate) -> Result<User, Error>;
}

/// Profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    async fn profile(&self, user_id: UserId) -> Result<User, Error>;
}

/// Resolve a bearer token to the user it was issued to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Fails with `Unauthorized` for unknown or expired tokens.
    async fn verify(&self, token: &str) -> Result<UserId, Error>;
}
