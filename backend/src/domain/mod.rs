//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities shared by the API and persistence
//! layers, and the services that enforce the follow graph rules. Types stay
//! immutable; invariants are documented on each type.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `UserId`, `DisplayName`, `FollowCounts`: user identity and
//!   cached counters.
//! - `FollowRelationship`, `CounterDelta`, `FollowOutcome`: follow graph.
//! - `ActorContext`: the request's resolved identity.
//! - `FollowService`, `UserProfileService`: driving port implementations.

pub mod actor;
pub mod auth;
pub mod error;
pub mod follow;
pub mod follow_service;
pub mod ports;
pub mod profile_service;
pub mod trace_id;
pub mod user;

pub use self::actor::{ActorContext, LOGIN_REQUIRED_MESSAGE};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::follow::{
    ALREADY_FOLLOWING_MESSAGE, CounterDelta, FollowOutcome, FollowRelationship,
    FollowValidationError, NOT_FOLLOWING_MESSAGE, SELF_FOLLOW_MESSAGE, USER_NOT_FOUND_MESSAGE,
};
pub use self::follow_service::FollowService;
pub use self::profile_service::UserProfileService;
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DISPLAY_NAME_MIN, DisplayName, FollowCounts, User, UserId,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use inkpost::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthenticated("login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
