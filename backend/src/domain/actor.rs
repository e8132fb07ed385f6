//! Request-scoped actor context.
//!
//! Inbound adapters resolve the authenticated identity (from a session, a
//! token, a test harness) and hand it to domain services explicitly. Services
//! never consult ambient state to discover who is acting.

use super::{Error, UserId};

/// Message used when an operation requires an authenticated actor.
pub const LOGIN_REQUIRED_MESSAGE: &str = "login required";

/// The identity performing the current request, if one was resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorContext {
    actor: Option<UserId>,
}

impl ActorContext {
    /// Context for an authenticated actor.
    pub fn authenticated(actor: UserId) -> Self {
        Self { actor: Some(actor) }
    }

    /// Context with no resolved identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The actor, if resolved.
    pub fn actor(&self) -> Option<&UserId> {
        self.actor.as_ref()
    }

    /// The actor, or an `unauthenticated` error.
    ///
    /// # Examples
    /// ```
    /// use inkpost::domain::{ActorContext, ErrorCode};
    ///
    /// let err = ActorContext::anonymous().require_actor().unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::Unauthenticated);
    /// ```
    pub fn require_actor(&self) -> Result<&UserId, Error> {
        self.actor
            .as_ref()
            .ok_or_else(|| Error::unauthenticated(LOGIN_REQUIRED_MESSAGE))
    }
}

impl From<Option<UserId>> for ActorContext {
    fn from(actor: Option<UserId>) -> Self {
        Self { actor }
    }
}
