//! Guest account services: registration, login, profiles and token checks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccessTokenRepository, AccessTokenRepositoryError, AccountCommand, NewUser, PasswordHasher,
    ProfileQuery, TokenIssuer, TokenVerifier, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthenticatedSession, Error, LoginCredentials, ProfileUpdate, Registration, User, UserId,
};

/// Lifetime of an issued bearer token when none is configured.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Longest token lifetime accepted from configuration (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::invalid_request("email already exists")
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
    }
}

fn map_token_error(error: AccessTokenRepositoryError) -> Error {
    match error {
        AccessTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AccessTokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

/// Hashing and token primitives used by [`AccountService`].
#[derive(Clone)]
pub struct CredentialPrimitives {
    pub hasher: Arc<dyn PasswordHasher>,
    pub issuer: Arc<dyn TokenIssuer>,
}

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    credentials: CredentialPrimitives,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
}

impl<U, T> AccountService<U, T> {
    pub fn new(
        users: Arc<U>,
        tokens: Arc<T>,
        credentials: CredentialPrimitives,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            credentials,
            clock,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    /// Override how long issued tokens stay valid.
    #[must_use]
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}

#[async_trait]
impl<U, T> AccountCommand for AccountService<U, T>
where
    U: UserRepository,
    T: AccessTokenRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let Registration {
            name,
            email,
            password,
            phone,
        } = registration;
        let new_user = NewUser {
            name,
            email,
            phone,
            password_hash: self.credentials.hasher.hash(password.expose()),
            created_at: self.clock.utc(),
        };
        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, "guest registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let Some(record) = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .credentials
            .hasher
            .verify(credentials.password(), &record.password_hash)
        {
            warn!(user_id = %record.user.id, "password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let now = self.clock.utc();
        let expires_at = now
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| Error::internal("token expiry is out of range"))?;
        match self.tokens.purge_expired(now).await {
            Ok(0) => {}
            Ok(purged) => debug!(purged, "expired access tokens purged"),
            Err(error) => warn!(%error, "expired token sweep failed"),
        }

        let token = self.credentials.issuer.issue();
        self.tokens
            .store(
                &self.credentials.issuer.digest(token.as_str()),
                record.user.id,
                expires_at,
            )
            .await
            .map_err(map_token_error)?;

        info!(user_id = %record.user.id, %expires_at, "access token issued");
        Ok(AuthenticatedSession {
            user: record.user,
            token,
        })
    }

    async fn update_profile(&self, user_id: UserId, update: ProfileUpdate) -> Result<User, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request("no profile fields supplied"));
        }
        self.users
            .update_profile(user_id, &update)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U, T> ProfileQuery for AccountService<U, T>
where
    U: UserRepository,
    T: AccessTokenRepository,
{
    async fn profile(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U, T> TokenVerifier for AccountService<U, T>
where
    U: UserRepository,
    T: AccessTokenRepository,
{
    async fn verify(&self, token: &str) -> Result<UserId, Error> {
        let digest = self.credentials.issuer.digest(token);
        self.tokens
            .find_active(&digest, self.clock.utc())
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("invalid or expired token"))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
