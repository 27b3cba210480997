//! Account and token ports over the in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{MemoryStore, Poisoned, StoredToken, StoredUser, next_id};
use crate::domain::ports::{
    AccessTokenRepository, AccessTokenRepositoryError, NewUser, UserCredentialsRecord,
    UserPersistenceError, UserRepository,
};
use crate::domain::{ProfileUpdate, User, UserId};

impl From<Poisoned> for UserPersistenceError {
    fn from(_: Poisoned) -> Self {
        UserPersistenceError::query("memory store lock poisoned")
    }
}

impl From<Poisoned> for AccessTokenRepositoryError {
    fn from(_: Poisoned) -> Self {
        AccessTokenRepositoryError::query("memory store lock poisoned")
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock()?;
        if state
            .users
            .values()
            .any(|stored| stored.user.email == user.email)
        {
            return Err(UserPersistenceError::duplicate_email(user.email.as_str()));
        }
        let id = next_id(&mut state.sequences.users, UserId::new)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let stored = User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            created_at: user.created_at,
        };
        state.users.insert(
            id,
            StoredUser {
                user: stored.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(stored)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError> {
        let needle = email.trim().to_lowercase();
        Ok(self
            .lock()?
            .users
            .values()
            .find(|stored| stored.user.email.as_str() == needle)
            .map(|stored| UserCredentialsRecord {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock()?;
        Ok(state.users.get_mut(&id).map(|stored| {
            if let Some(name) = &update.name {
                stored.user.name = name.clone();
            }
            if let Some(phone) = &update.phone {
                stored.user.phone = phone.clone();
            }
            stored.user.clone()
        }))
    }
}

#[async_trait]
impl AccessTokenRepository for MemoryStore {
    async fn store(
        &self,
        digest: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccessTokenRepositoryError> {
        self.lock()?.tokens.insert(
            digest.to_owned(),
            StoredToken {
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn find_active(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, AccessTokenRepositoryError> {
        Ok(self
            .lock()?
            .tokens
            .get(digest)
            .filter(|token| token.expires_at > now)
            .map(|token| token.user_id))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AccessTokenRepositoryError> {
        let mut state = self.lock()?;
        let before = state.tokens.len();
        state.tokens.retain(|_, token| token.expires_at > now);
        Ok(u64::try_from(before - state.tokens.len()).unwrap_or(u64::MAX))
    }
}
