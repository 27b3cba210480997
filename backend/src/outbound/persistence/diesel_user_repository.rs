//! PostgreSQL-backed [`UserRepository`] and [`AccessTokenRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    AccessTokenRepository, AccessTokenRepositoryError, NewUser, UserCredentialsRecord,
    UserPersistenceError, UserRepository,
};
use crate::domain::{ProfileUpdate, User, UserId};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, map_pool_error_message};
use super::models::{NewAccessTokenRow, NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{access_tokens, users};

/// Diesel implementation of the account and token ports.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(map_pool_error_message(error))
}

/// Map Diesel errors; a unique violation can only come from the email index.
fn map_diesel_error(error: DieselError, email: Option<&str>) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation(_) => {
            UserPersistenceError::duplicate_email(email.unwrap_or_default())
        }
        DieselFailure::ForeignKeyViolation(_) => {
            UserPersistenceError::query("unexpected foreign key violation")
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn map_token_diesel_error(error: DieselError) -> AccessTokenRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => AccessTokenRepositoryError::connection(message),
        DieselFailure::UniqueViolation(_) => {
            AccessTokenRepositoryError::query("token digest collision")
        }
        DieselFailure::ForeignKeyViolation(_) => {
            AccessTokenRepositoryError::query("token owner does not exist")
        }
        DieselFailure::Query(message) => AccessTokenRepositoryError::query(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                name: user.name.as_str(),
                email: user.email.as_str(),
                phone: user.phone.as_str(),
                password_hash: user.password_hash.as_str(),
                created_at: user.created_at,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(user.email.as_str())))?;
        row.into_user().map_err(UserPersistenceError::query)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(|row| {
            row.into_parts()
                .map(|(user, password_hash)| UserCredentialsRecord {
                    user,
                    password_hash,
                })
                .map_err(UserPersistenceError::query)
        })
        .transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(|row| row.into_user().map_err(UserPersistenceError::query))
            .transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(id.get()))
            .set(&UserProfileChangeset {
                name: update.name.as_ref().map(|name| name.as_str()),
                phone: update.phone.as_ref().map(|phone| phone.as_str()),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(|row| row.into_user().map_err(UserPersistenceError::query))
            .transpose()
    }
}

#[async_trait]
impl AccessTokenRepository for DieselUserRepository {
    async fn store(
        &self,
        digest: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccessTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            AccessTokenRepositoryError::connection(map_pool_error_message(err))
        })?;
        diesel::insert_into(access_tokens::table)
            .values(&NewAccessTokenRow {
                digest,
                user_id: user_id.get(),
                expires_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_token_diesel_error)
    }

    async fn find_active(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, AccessTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            AccessTokenRepositoryError::connection(map_pool_error_message(err))
        })?;
        let owner: Option<i64> = access_tokens::table
            .filter(access_tokens::digest.eq(digest))
            .filter(access_tokens::expires_at.gt(now))
            .select(access_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_token_diesel_error)?;
        owner
            .map(|raw| {
                UserId::new(raw).map_err(|err| AccessTokenRepositoryError::query(err.to_string()))
            })
            .transpose()
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AccessTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            AccessTokenRepositoryError::connection(map_pool_error_message(err))
        })?;
        let deleted = diesel::delete(access_tokens::table.filter(access_tokens::expires_at.le(now)))
            .execute(&mut conn)
            .await
            .map_err(map_token_diesel_error)?;
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection() {
        let error = map_pool_error(PoolError::checkout("refused"));
        assert!(matches!(error, UserPersistenceError::Connection { .. }));
        assert!(error.to_string().contains("refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query() {
        let error = map_diesel_error(DieselError::NotFound, None);
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn token_errors_map_to_query() {
        let error = map_token_diesel_error(DieselError::NotFound);
        assert!(matches!(error, AccessTokenRepositoryError::Query { .. }));
    }
}
