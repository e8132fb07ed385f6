//! Driven port for follow relationship persistence.
//!
//! The store's uniqueness guarantee on `(follower_id, following_id)` is the
//! authoritative duplicate guard: two concurrent follows can both pass the
//! service's existence check, and exactly one insert must then fail with
//! [`FollowStoreError::Duplicate`].

use async_trait::async_trait;

use crate::domain::{FollowRelationship, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by follow store adapters.
    pub enum FollowStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "follow store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow store query failed: {message}",
        /// The relationship already exists.
        Duplicate => "follow relationship already exists",
    }
}

/// Port for creating, reading and deleting directed follow edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Fetch the edge `follower_id -> following_id`, if present.
    async fn find_relationship(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<Option<FollowRelationship>, FollowStoreError>;

    /// Insert a new edge.
    ///
    /// Returns [`FollowStoreError::Duplicate`] when the pair already exists.
    async fn create_relationship(
        &self,
        relationship: &FollowRelationship,
    ) -> Result<(), FollowStoreError>;

    /// Delete the edge `follower_id -> following_id`.
    ///
    /// Returns `true` when a row was removed and `false` when there was
    /// nothing to delete.
    async fn delete_relationship(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, FollowStoreError>;
}
