//! Driven port for user lookups and counter maintenance.
//!
//! Counter adjustments must be applied by the adapter as one atomic
//! "add delta, floor at zero" statement. Callers never read a count, compute
//! a new value, and write it back.

use async_trait::async_trait;

use crate::domain::{CounterDelta, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
    }
}

/// Port for reading users and adjusting their denormalised follow counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user, including current counters.
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Insert `user` unless a row with its id already exists.
    ///
    /// Existing rows, counters included, are left untouched.
    async fn ensure_user(&self, user: &User) -> Result<(), UserStoreError>;

    /// Atomically apply `delta` to the user's follower count, clamping at zero.
    ///
    /// Adjusting a user that does not exist is a no-op.
    async fn adjust_follower_count(
        &self,
        id: &UserId,
        delta: CounterDelta,
    ) -> Result<(), UserStoreError>;

    /// Atomically apply `delta` to the user's following count, clamping at zero.
    ///
    /// Adjusting a user that does not exist is a no-op.
    async fn adjust_following_count(
        &self,
        id: &UserId,
        delta: CounterDelta,
    ) -> Result<(), UserStoreError>;
}
