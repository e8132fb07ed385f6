//! Driving port for follow graph mutations.
//!
//! Inbound adapters call this port with the request's [`ActorContext`]; the
//! actor is never taken from a request body.

use async_trait::async_trait;

use crate::domain::{ActorContext, Error, FollowOutcome, UserId};

/// Domain use-case port for following and unfollowing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Make the actor follow `target`.
    async fn follow(&self, ctx: &ActorContext, target: &UserId) -> Result<FollowOutcome, Error>;

    /// Remove the actor's follow of `target`.
    async fn unfollow(&self, ctx: &ActorContext, target: &UserId)
    -> Result<FollowOutcome, Error>;
}
