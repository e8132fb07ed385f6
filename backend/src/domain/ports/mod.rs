//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports (`FollowCommand`, `UserProfileQuery`, `LoginService`) are
//! what inbound adapters call. Driven ports (`UserStore`, `FollowStore`) are
//! what the domain services call; each exposes a strongly typed error so
//! adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod follow_command;
mod follow_store;
mod login_service;
mod user_profile_query;
mod user_store;

#[cfg(test)]
pub use follow_command::MockFollowCommand;
pub use follow_command::FollowCommand;
#[cfg(test)]
pub use follow_store::MockFollowStore;
pub use follow_store::{FollowStore, FollowStoreError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{INVALID_CREDENTIALS_MESSAGE, LoginService};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::{UserProfile, UserProfileQuery};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
