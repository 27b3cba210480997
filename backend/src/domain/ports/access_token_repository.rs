//! Port for issued bearer tokens.
//!
//! Adapters only ever see token digests, never the tokens handed to clients.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by access token repository adapters.
    pub enum AccessTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "access token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "access token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    /// Record a token digest for a user until `expires_at`.
    async fn store(
        &self,
        digest: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccessTokenRepositoryError>;

    /// Owner of an unexpired token digest.
    async fn find_active(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, AccessTokenRepositoryError>;

    /// Delete every digest that expired at or before `now`; returns how many went.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AccessTokenRepositoryError>;
}
