//! Development `LoginService` adapter for PostgreSQL deployments.
//!
//! Accepts the fixture account (`admin`/`password`) and makes sure the fixture
//! user row exists so follow edges referencing it satisfy the foreign keys.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{INVALID_CREDENTIALS_MESSAGE, LoginService, UserStore, UserStoreError};
use crate::domain::{DisplayName, Error, LoginCredentials, User, UserId};

use super::diesel_user_store::DieselUserStore;

const FIXTURE_USERNAME: &str = "admin";
const FIXTURE_PASSWORD: &str = "password";
const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
const FIXTURE_DISPLAY_NAME: &str = "Ada Lovelace";

/// Fixture-authenticating `LoginService` over a user store.
#[derive(Clone)]
pub struct DieselLoginService {
    user_store: Arc<dyn UserStore>,
}

impl DieselLoginService {
    /// Create a new service backed by the Diesel user store.
    pub fn new(user_store: DieselUserStore) -> Self {
        Self {
            user_store: Arc::new(user_store),
        }
    }

    #[cfg(test)]
    fn from_store(user_store: Arc<dyn UserStore>) -> Self {
        Self { user_store }
    }
}

fn map_store_error(error: UserStoreError) -> Error {
    Error::internal(format!("user store error: {error}"))
}

fn fixture_user() -> Result<User, Error> {
    let id = UserId::new(FIXTURE_USER_ID)
        .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
    let display_name = DisplayName::new(FIXTURE_DISPLAY_NAME)
        .map_err(|err| Error::internal(format!("invalid fixture display name: {err}")))?;
    Ok(User::new(id, display_name))
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if !credentials.matches(FIXTURE_USERNAME, FIXTURE_PASSWORD) {
            return Err(Error::unauthenticated(INVALID_CREDENTIALS_MESSAGE));
        }

        let user = fixture_user()?;
        self.user_store
            .ensure_user(&user)
            .await
            .map_err(map_store_error)?;
        debug!(user = %user.id(), "fixture login");
        Ok(user.id().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserStore;
    use crate::outbound::memory::InMemoryUserStore;
    use rstest::rstest;

    fn credentials(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("valid test credentials")
    }

    #[tokio::test]
    async fn fixture_login_creates_missing_user() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = DieselLoginService::from_store(store.clone());

        let id = service
            .authenticate(&credentials("admin", "password"))
            .await
            .expect("fixture credentials authenticate");

        assert_eq!(id.as_ref(), FIXTURE_USER_ID);
        let stored = store
            .find_user_by_id(&id)
            .await
            .expect("lookup")
            .expect("fixture user stored");
        assert_eq!(stored.display_name().as_ref(), FIXTURE_DISPLAY_NAME);
        assert_eq!(stored.follower_count(), 0);
    }

    #[rstest]
    #[case("admin", "wrong-password")]
    #[case("someone", "password")]
    #[tokio::test]
    async fn non_fixture_credentials_are_rejected(#[case] username: &str, #[case] password: &str) {
        let mut store = MockUserStore::new();
        store.expect_ensure_user().never();
        let service = DieselLoginService::from_store(Arc::new(store));

        let err = service
            .authenticate(&credentials(username, password))
            .await
            .expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthenticated);
        assert_eq!(err.message(), "invalid credentials");
    }

    #[tokio::test]
    async fn store_failure_is_internal() {
        let mut store = MockUserStore::new();
        store
            .expect_ensure_user()
            .times(1)
            .return_once(|_| Err(UserStoreError::connection("database unavailable")));
        let service = DieselLoginService::from_store(Arc::new(store));

        let err = service
            .authenticate(&credentials("admin", "password"))
            .await
            .expect_err("store down");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
