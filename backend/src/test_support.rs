//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/` (through
//! the `test-support` feature). Everything here runs against the in-memory
//! adapters, so no database is required.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::{DisplayName, FollowCounts, FollowService, User, UserId, UserProfileService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryFollowStore, InMemoryLoginService, InMemoryUserStore};

/// Password given to every account created by [`MemoryBackend::add_account`].
pub const TEST_PASSWORD: &str = "correct horse";

/// In-memory stores plus the login service, wired together for HTTP tests.
///
/// # Examples
/// ```
/// use inkpost::test_support::MemoryBackend;
///
/// let backend = MemoryBackend::new();
/// let _state = backend.http_state();
/// ```
#[derive(Clone)]
pub struct MemoryBackend {
    /// User records and counters.
    pub users: Arc<InMemoryUserStore>,
    /// Follow edges.
    pub follows: Arc<InMemoryFollowStore>,
    /// Registered accounts.
    pub login: Arc<InMemoryLoginService>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl MemoryBackend {
    /// Empty backend on the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty backend timestamping relationships with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            follows: Arc::new(InMemoryFollowStore::new()),
            login: Arc::new(InMemoryLoginService::new()),
            clock,
        }
    }

    /// Create a user with the given counters and a login for `username`
    /// using [`TEST_PASSWORD`].
    ///
    /// # Panics
    ///
    /// Panics when `display_name` is not a valid display name.
    pub async fn add_account(
        &self,
        username: &str,
        display_name: &str,
        counts: FollowCounts,
    ) -> UserId {
        let id = UserId::random();
        let display_name = DisplayName::new(display_name)
            .unwrap_or_else(|err| panic!("invalid test display name {display_name:?}: {err}"));
        self.users
            .insert(User::with_counts(id.clone(), display_name, counts))
            .await;
        self.login.register(username, TEST_PASSWORD, id.clone()).await;
        id
    }

    /// Stored user, if any.
    pub async fn user(&self, id: &UserId) -> Option<User> {
        use crate::domain::ports::UserStore;

        self.users.find_user_by_id(id).await.ok().flatten()
    }

    /// HTTP state backed by these stores.
    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            self.login.clone(),
            Arc::new(FollowService::new(
                self.users.clone(),
                self.follows.clone(),
                self.clock.clone(),
            )),
            Arc::new(UserProfileService::new(
                self.users.clone(),
                self.follows.clone(),
            )),
        )
    }
}
