//! Driving port for profile reads.
//!
//! Used when rendering a profile: the subject's counters plus whether the
//! viewer currently follows them.

use async_trait::async_trait;

use crate::domain::{ActorContext, Error, User, UserId};

/// Profile read model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// The subject, with counters as stored.
    pub user: User,
    /// Whether the viewer follows the subject. Always `false` for anonymous
    /// viewers and for the viewer's own profile.
    pub is_following: bool,
}

/// Domain use-case port for reading profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Load `subject` as seen by the context's viewer.
    async fn fetch_profile(&self, ctx: &ActorContext, subject: &UserId)
    -> Result<UserProfile, Error>;

    /// Whether `viewer` follows `subject`.
    async fn is_following(&self, viewer: &UserId, subject: &UserId) -> Result<bool, Error>;
}
