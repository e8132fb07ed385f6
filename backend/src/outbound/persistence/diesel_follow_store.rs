//! PostgreSQL-backed `FollowStore` adapter.
//!
//! The `follows` primary key is the duplicate guard; a unique violation on
//! insert surfaces as [`FollowStoreError::Duplicate`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FollowStore, FollowStoreError};
use crate::domain::{FollowRelationship, UserId};

use super::diesel_basic_error_mapping::StoreFailure;
use super::models::{FollowRow, NewFollowRow};
use super::pool::DbPool;
use super::schema::follows;

/// Diesel-backed implementation of the `FollowStore` port.
#[derive(Clone)]
pub struct DieselFollowStore {
    pool: DbPool,
}

impl DieselFollowStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> FollowStoreError {
    match failure.into() {
        StoreFailure::Connection(message) => FollowStoreError::connection(message),
        StoreFailure::Query(message) => FollowStoreError::query(message),
        StoreFailure::UniqueViolation => FollowStoreError::duplicate(),
    }
}

fn row_to_relationship(row: FollowRow) -> Result<FollowRelationship, FollowStoreError> {
    FollowRelationship::new(
        UserId::from_uuid(row.follower_id),
        UserId::from_uuid(row.following_id),
        row.created_at,
    )
    .map_err(|err| FollowStoreError::query(format!("invalid stored relationship: {err}")))
}

#[async_trait]
impl FollowStore for DieselFollowStore {
    async fn find_relationship(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<Option<FollowRelationship>, FollowStoreError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let row = follows::table
            .find((*follower_id.as_uuid(), *following_id.as_uuid()))
            .select(FollowRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(row_to_relationship).transpose()
    }

    async fn create_relationship(
        &self,
        relationship: &FollowRelationship,
    ) -> Result<(), FollowStoreError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let new_row = NewFollowRow {
            follower_id: *relationship.follower_id().as_uuid(),
            following_id: *relationship.following_id().as_uuid(),
            created_at: relationship.created_at(),
        };
        diesel::insert_into(follows::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_failure)
    }

    async fn delete_relationship(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, FollowStoreError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let key = (*follower_id.as_uuid(), *following_id.as_uuid());
        let deleted = diesel::delete(follows::table.find(key))
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;

        Ok(deleted > 0)
    }
}
