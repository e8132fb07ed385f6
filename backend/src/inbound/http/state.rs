//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so they
//! can be exercised without I/O.

use std::sync::Arc;

use crate::domain::ports::{FollowCommand, LoginService, UserProfileQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential check used by `POST /login`.
    pub login: Arc<dyn LoginService>,
    /// Follow and unfollow use-cases.
    pub follows: Arc<dyn FollowCommand>,
    /// Profile reads.
    pub profiles: Arc<dyn UserProfileQuery>,
}

impl HttpState {
    /// Bundle the given ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use inkpost::domain::{FollowService, UserProfileService};
    /// use inkpost::inbound::http::state::HttpState;
    /// use inkpost::outbound::memory::{InMemoryFollowStore, InMemoryLoginService, InMemoryUserStore};
    ///
    /// let users = Arc::new(InMemoryUserStore::new());
    /// let follows = Arc::new(InMemoryFollowStore::new());
    /// let state = HttpState::new(
    ///     Arc::new(InMemoryLoginService::new()),
    ///     Arc::new(FollowService::new(
    ///         users.clone(),
    ///         follows.clone(),
    ///         Arc::new(mockable::DefaultClock),
    ///     )),
    ///     Arc::new(UserProfileService::new(users, follows)),
    /// );
    /// let _follows = state.follows.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        follows: Arc<dyn FollowCommand>,
        profiles: Arc<dyn UserProfileQuery>,
    ) -> Self {
        Self {
            login,
            follows,
            profiles,
        }
    }
}
