//! Profile read service.
//!
//! Answers "does the viewer follow this user" from the relationship set,
//! never from the cached counters.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    FollowStore, FollowStoreError, UserProfile, UserProfileQuery, UserStore, UserStoreError,
};
use crate::domain::{ActorContext, Error, USER_NOT_FOUND_MESSAGE, UserId};

/// Profile service implementing the profile query port.
#[derive(Clone)]
pub struct UserProfileService<U, F> {
    user_store: Arc<U>,
    follow_store: Arc<F>,
}

impl<U, F> UserProfileService<U, F> {
    /// Create a new service over the given stores.
    pub fn new(user_store: Arc<U>, follow_store: Arc<F>) -> Self {
        Self {
            user_store,
            follow_store,
        }
    }
}

fn map_user_store_error(error: UserStoreError) -> Error {
    Error::internal(format!("user store error: {error}"))
}

fn map_follow_store_error(error: FollowStoreError) -> Error {
    Error::internal(format!("follow store error: {error}"))
}

#[async_trait]
impl<U, F> UserProfileQuery for UserProfileService<U, F>
where
    U: UserStore,
    F: FollowStore,
{
    async fn fetch_profile(
        &self,
        ctx: &ActorContext,
        subject: &UserId,
    ) -> Result<UserProfile, Error> {
        let user = self
            .user_store
            .find_user_by_id(subject)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MESSAGE))?;

        let is_following = match ctx.actor() {
            Some(viewer) if viewer != subject => self.is_following(viewer, subject).await?,
            _ => false,
        };

        Ok(UserProfile { user, is_following })
    }

    async fn is_following(&self, viewer: &UserId, subject: &UserId) -> Result<bool, Error> {
        self.follow_store
            .find_relationship(viewer, subject)
            .await
            .map(|edge| edge.is_some())
            .map_err(map_follow_store_error)
    }
}
