//! PostgreSQL-backed `UserStore` adapter.
//!
//! Counter adjustments are one `UPDATE ... SET c = GREATEST(c + delta, 0)`
//! statement, so concurrent adjustments never lose updates and never drive a
//! counter below zero.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::{QueryFragment, QueryId};
use diesel::sql_types::Integer;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{CounterDelta, DisplayName, FollowCounts, User, UserId};

use super::diesel_basic_error_mapping::StoreFailure;
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

diesel::define_sql_function! {
    /// PostgreSQL `GREATEST` over two integers.
    fn greatest(a: Integer, b: Integer) -> Integer;
}

/// Diesel-backed implementation of the `UserStore` port.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> UserStoreError {
    match failure.into() {
        StoreFailure::Connection(message) => UserStoreError::connection(message),
        StoreFailure::Query(message) => UserStoreError::query(message),
        StoreFailure::UniqueViolation => UserStoreError::query("unexpected unique violation"),
    }
}

/// `UPDATE users SET follower_count = GREATEST(follower_count + delta, 0)`.
fn follower_count_update(
    id: Uuid,
    delta: CounterDelta,
) -> impl QueryFragment<Pg> + QueryId + Send {
    diesel::update(users::table.filter(users::id.eq(id)))
        .set(users::follower_count.eq(greatest(users::follower_count + delta.as_i32(), 0)))
}

/// `UPDATE users SET following_count = GREATEST(following_count + delta, 0)`.
fn following_count_update(
    id: Uuid,
    delta: CounterDelta,
) -> impl QueryFragment<Pg> + QueryId + Send {
    diesel::update(users::table.filter(users::id.eq(id)))
        .set(users::following_count.eq(greatest(users::following_count + delta.as_i32(), 0)))
}

fn counter_from_column(value: i32, column: &'static str) -> Result<u32, UserStoreError> {
    u32::try_from(value).map_err(|_| UserStoreError::query(format!("negative {column}: {value}")))
}

fn row_to_user(row: UserRow) -> Result<User, UserStoreError> {
    let display_name = DisplayName::new(row.display_name)
        .map_err(|err| UserStoreError::query(format!("invalid stored display name: {err}")))?;
    let counts = FollowCounts {
        followers: counter_from_column(row.follower_count, "follower_count")?,
        following: counter_from_column(row.following_count, "following_count")?,
    };
    Ok(User::with_counts(
        UserId::from_uuid(row.id),
        display_name,
        counts,
    ))
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let row = users::table
            .filter(users::id.eq(*id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(row_to_user).transpose()
    }

    async fn ensure_user(&self, user: &User) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            display_name: user.display_name().as_ref(),
        };
        diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict(users::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_failure)
    }

    async fn adjust_follower_count(
        &self,
        id: &UserId,
        delta: CounterDelta,
    ) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let updated = follower_count_update(*id.as_uuid(), delta)
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        debug!(user = %id, delta = delta.as_i32(), updated, "follower count adjusted");
        Ok(())
    }

    async fn adjust_following_count(
        &self,
        id: &UserId,
        delta: CounterDelta,
    ) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let updated = following_count_update(*id.as_uuid(), delta)
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        debug!(user = %id, delta = delta.as_i32(), updated, "following count adjusted");
        Ok(())
    }
}
