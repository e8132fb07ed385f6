//! Follow graph primitives.
//!
//! A [`FollowRelationship`] is a directed edge `(follower, following)`. Its
//! presence is the single source of truth for "is following"; the counters on
//! [`crate::domain::User`] are a derived cache.

use chrono::{DateTime, Utc};

use super::UserId;

/// Message returned when an actor targets themselves.
pub const SELF_FOLLOW_MESSAGE: &str = "Cannot follow yourself";
/// Message returned when the target user does not resolve.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";
/// Message returned when the relationship already exists.
pub const ALREADY_FOLLOWING_MESSAGE: &str = "Already following this user";
/// Message returned when unfollowing without a relationship.
pub const NOT_FOLLOWING_MESSAGE: &str = "Not following this user";

/// Validation errors raised by [`FollowRelationship::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FollowValidationError {
    /// Follower and following identify the same user.
    #[error("a user cannot follow themselves")]
    SelfFollow,
}

/// Directed follow edge.
///
/// ## Invariants
/// - `follower_id != following_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowRelationship {
    follower_id: UserId,
    following_id: UserId,
    created_at: DateTime<Utc>,
}

impl FollowRelationship {
    /// Build an edge, rejecting self-follows.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use inkpost::domain::{FollowRelationship, UserId};
    ///
    /// let a = UserId::random();
    /// let b = UserId::random();
    /// assert!(FollowRelationship::new(a.clone(), b, Utc::now()).is_ok());
    /// assert!(FollowRelationship::new(a.clone(), a, Utc::now()).is_err());
    /// ```
    pub fn new(
        follower_id: UserId,
        following_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, FollowValidationError> {
        if follower_id == following_id {
            return Err(FollowValidationError::SelfFollow);
        }
        Ok(Self {
            follower_id,
            following_id,
            created_at,
        })
    }

    /// The user doing the following.
    pub fn follower_id(&self) -> &UserId {
        &self.follower_id
    }

    /// The user being followed.
    pub fn following_id(&self) -> &UserId {
        &self.following_id
    }

    /// When the edge was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Signed adjustment applied to a denormalised counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterDelta {
    /// Add one.
    Increment,
    /// Subtract one, flooring at zero.
    Decrement,
}

impl CounterDelta {
    /// The delta as a signed integer suitable for `count + delta`.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }

    /// Apply the delta to `current`, clamping the result at zero.
    ///
    /// # Examples
    /// ```
    /// use inkpost::domain::CounterDelta;
    ///
    /// assert_eq!(CounterDelta::Increment.apply_floored(10), 11);
    /// assert_eq!(CounterDelta::Decrement.apply_floored(0), 0);
    /// ```
    pub fn apply_floored(self, current: u32) -> u32 {
        match self {
            Self::Increment => current.saturating_add(1),
            Self::Decrement => current.saturating_sub(1),
        }
    }
}

/// State reported back after a follow or unfollow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    /// Whether the actor follows the target after the operation.
    pub is_following: bool,
    /// The target's stored follower count, re-read after the mutation.
    pub follower_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_self_follow_regardless_of_spelling() {
        let lower = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let upper = UserId::new("3FA85F64-5717-4562-B3FC-2C963F66AFA6").expect("valid id");

        let result = FollowRelationship::new(lower, upper, Utc::now());

        assert_eq!(result, Err(FollowValidationError::SelfFollow));
    }

    #[rstest]
    #[case(CounterDelta::Increment, 0, 1)]
    #[case(CounterDelta::Increment, u32::MAX, u32::MAX)]
    #[case(CounterDelta::Decrement, 5, 4)]
    #[case(CounterDelta::Decrement, 0, 0)]
    fn apply_floored_never_underflows(
        #[case] delta: CounterDelta,
        #[case] current: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(delta.apply_floored(current), expected);
    }
}
