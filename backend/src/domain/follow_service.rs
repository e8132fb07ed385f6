//! Follow graph domain service.
//!
//! Implements [`FollowCommand`] over the [`UserStore`] and [`FollowStore`]
//! driven ports. The relationship row is written first and decides the
//! response; counter maintenance follows and is never rolled back.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    FollowCommand, FollowStore, FollowStoreError, UserStore, UserStoreError,
};
use crate::domain::{
    ALREADY_FOLLOWING_MESSAGE, ActorContext, CounterDelta, Error, FollowOutcome,
    FollowRelationship, NOT_FOLLOWING_MESSAGE, SELF_FOLLOW_MESSAGE, USER_NOT_FOUND_MESSAGE,
    UserId,
};

/// Follow service implementing the follow command port.
#[derive(Clone)]
pub struct FollowService<U, F> {
    user_store: Arc<U>,
    follow_store: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<U, F> FollowService<U, F> {
    /// Create a new service over the given stores.
    pub fn new(user_store: Arc<U>, follow_store: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_store,
            follow_store,
            clock,
        }
    }
}

fn map_user_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => {
            Error::internal(format!("user store unavailable: {message}"))
        }
        UserStoreError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

fn map_follow_store_error(error: FollowStoreError) -> Error {
    match error {
        FollowStoreError::Connection { message } => {
            Error::internal(format!("follow store unavailable: {message}"))
        }
        FollowStoreError::Query { message } => {
            Error::internal(format!("follow store error: {message}"))
        }
        FollowStoreError::Duplicate => Error::conflict(ALREADY_FOLLOWING_MESSAGE),
    }
}

impl<U, F> FollowService<U, F>
where
    U: UserStore,
    F: FollowStore,
{
    /// Apply `delta` to both counters of the edge `actor -> target`.
    ///
    /// Failures are logged and swallowed: the relationship write has already
    /// happened and determines the outcome.
    async fn adjust_counters(&self, actor: &UserId, target: &UserId, delta: CounterDelta) {
        if let Err(err) = self.user_store.adjust_follower_count(target, delta).await {
            error!(
                actor = %actor,
                target = %target,
                delta = delta.as_i32(),
                error.kind = err.kind(),
                error = %err,
                "follower count adjustment failed"
            );
        }
        if let Err(err) = self.user_store.adjust_following_count(actor, delta).await {
            error!(
                actor = %actor,
                target = %target,
                delta = delta.as_i32(),
                error.kind = err.kind(),
                error = %err,
                "following count adjustment failed"
            );
        }
    }

    async fn reread_follower_count(&self, target: &UserId) -> Result<u32, Error> {
        let user = self
            .user_store
            .find_user_by_id(target)
            .await
            .map_err(map_user_store_error)?;
        match user {
            Some(user) => Ok(user.follower_count()),
            None => {
                warn!(target = %target, "target vanished before follower count re-read");
                Ok(0)
            }
        }
    }
}

#[async_trait]
impl<U, F> FollowCommand for FollowService<U, F>
where
    U: UserStore,
    F: FollowStore,
{
    async fn follow(&self, ctx: &ActorContext, target: &UserId) -> Result<FollowOutcome, Error> {
        let actor = ctx.require_actor()?;
        if actor == target {
            return Err(Error::invalid_operation(SELF_FOLLOW_MESSAGE));
        }

        self.user_store
            .find_user_by_id(target)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MESSAGE))?;

        if self
            .follow_store
            .find_relationship(actor, target)
            .await
            .map_err(map_follow_store_error)?
            .is_some()
        {
            return Err(Error::conflict(ALREADY_FOLLOWING_MESSAGE));
        }

        let relationship = FollowRelationship::new(actor.clone(), target.clone(), self.clock.utc())
            .map_err(|_| Error::invalid_operation(SELF_FOLLOW_MESSAGE))?;
        self.follow_store
            .create_relationship(&relationship)
            .await
            .map_err(map_follow_store_error)?;
        debug!(actor = %actor, target = %target, "follow relationship created");

        self.adjust_counters(actor, target, CounterDelta::Increment)
            .await;
        let follower_count = self.reread_follower_count(target).await?;

        Ok(FollowOutcome {
            is_following: true,
            follower_count,
        })
    }

    async fn unfollow(
        &self,
        ctx: &ActorContext,
        target: &UserId,
    ) -> Result<FollowOutcome, Error> {
        let actor = ctx.require_actor()?;

        if self
            .follow_store
            .find_relationship(actor, target)
            .await
            .map_err(map_follow_store_error)?
            .is_none()
        {
            return Err(Error::invalid_operation(NOT_FOLLOWING_MESSAGE));
        }

        let deleted = self
            .follow_store
            .delete_relationship(actor, target)
            .await
            .map_err(map_follow_store_error)?;
        if !deleted {
            debug!(actor = %actor, target = %target, "relationship removed concurrently");
            return Err(Error::invalid_operation(NOT_FOLLOWING_MESSAGE));
        }
        debug!(actor = %actor, target = %target, "follow relationship deleted");

        self.adjust_counters(actor, target, CounterDelta::Decrement)
            .await;
        let follower_count = self.reread_follower_count(target).await?;

        Ok(FollowOutcome {
            is_following: false,
            follower_count,
        })
    }
}

#[cfg(test)]
#[path = "follow_service_tests.rs"]
mod tests;
