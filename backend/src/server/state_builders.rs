//! Builders wiring driven adapters into [`HttpState`].
//!
//! With a pool the Diesel adapters back every port. Without one the server
//! runs on in-memory stores seeded with two demo accounts so the follow
//! endpoints can be tried locally.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use inkpost::domain::ports::{FollowStore, LoginService, UserStore};
use inkpost::domain::{DisplayName, FollowService, User, UserId, UserProfileService};
use inkpost::inbound::http::state::HttpState;
use inkpost::outbound::memory::{InMemoryFollowStore, InMemoryLoginService, InMemoryUserStore};
use inkpost::outbound::persistence::{
    DbPool, DieselFollowStore, DieselLoginService, DieselUserStore,
};

/// Demo accounts as `(username, password, user id, display name)`.
const DEMO_ACCOUNTS: [(&str, &str, &str, &str); 2] = [
    (
        "admin",
        "password",
        "123e4567-e89b-12d3-a456-426614174000",
        "Ada Lovelace",
    ),
    (
        "grace",
        "password",
        "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "Grace Hopper",
    ),
];

fn state_over<U, F>(
    login: Arc<dyn LoginService>,
    users: Arc<U>,
    follows: Arc<F>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserStore + 'static,
    F: FollowStore + 'static,
{
    HttpState::new(
        login,
        Arc::new(FollowService::new(users.clone(), follows.clone(), clock)),
        Arc::new(UserProfileService::new(users, follows)),
    )
}

/// Diesel-backed state.
pub(crate) fn build_db_http_state(pool: &DbPool) -> HttpState {
    let users = DieselUserStore::new(pool.clone());
    let login = Arc::new(DieselLoginService::new(users.clone()));
    state_over(
        login,
        Arc::new(users),
        Arc::new(DieselFollowStore::new(pool.clone())),
        Arc::new(DefaultClock),
    )
}

/// In-memory state seeded with [`DEMO_ACCOUNTS`].
pub(crate) async fn build_memory_http_state() -> HttpState {
    let users = Arc::new(InMemoryUserStore::new());
    let login = Arc::new(InMemoryLoginService::new());
    for (username, password, raw_id, raw_name) in DEMO_ACCOUNTS {
        match (UserId::new(raw_id), DisplayName::new(raw_name)) {
            (Ok(id), Ok(name)) => {
                users.insert(User::new(id.clone(), name)).await;
                login.register(username, password, id).await;
            }
            (id, name) => {
                warn!(
                    username,
                    id_ok = id.is_ok(),
                    name_ok = name.is_ok(),
                    "skipping invalid demo account"
                );
            }
        }
    }
    info!(accounts = DEMO_ACCOUNTS.len(), "serving from in-memory stores");
    state_over(
        login,
        users,
        Arc::new(InMemoryFollowStore::new()),
        Arc::new(DefaultClock),
    )
}
