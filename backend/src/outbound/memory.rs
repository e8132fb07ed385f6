//! In-memory adapters for the user, follow and login ports.
//!
//! Used when no database is configured and by tests. Each store keeps its
//! state behind one `tokio::sync::Mutex`, so a counter adjustment is a single
//! read-modify-write under the lock, matching the atomic update the
//! PostgreSQL adapter performs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{
    FollowStore, FollowStoreError, INVALID_CREDENTIALS_MESSAGE, LoginService, UserStore,
    UserStoreError,
};
use crate::domain::{
    CounterDelta, Error, FollowCounts, FollowRelationship, LoginCredentials, User, UserId,
};

/// User store holding users in a map keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.id().clone(), user))
            .collect();
        Self {
            users: Mutex::new(users),
        }
    }

    /// Insert or replace a user.
    pub async fn insert(&self, user: User) {
        self.users.lock().await.insert(user.id().clone(), user);
    }

    /// Apply `apply` to the user's counters under the lock and return the
    /// number of users updated (0 or 1).
    async fn adjust(
        &self,
        id: &UserId,
        counter: &'static str,
        delta: CounterDelta,
        apply: impl FnOnce(FollowCounts) -> FollowCounts,
    ) -> usize {
        let mut users = self.users.lock().await;
        let updated = match users.get_mut(id) {
            Some(user) => {
                let counts = apply(user.counts());
                *user = User::with_counts(user.id().clone(), user.display_name().clone(), counts);
                1
            }
            None => 0,
        };
        debug!(user = %id, counter, delta = delta.as_i32(), updated, "counter adjusted");
        updated
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn ensure_user(&self, user: &User) -> Result<(), UserStoreError> {
        self.users
            .lock()
            .await
            .entry(user.id().clone())
            .or_insert_with(|| user.clone());
        Ok(())
    }

    async fn adjust_follower_count(
        &self,
        id: &UserId,
        delta: CounterDelta,
    ) -> Result<(), UserStoreError> {
        self.adjust(id, "follower_count", delta, |counts| FollowCounts {
            followers: delta.apply_floored(counts.followers),
            ..counts
        })
        .await;
        Ok(())
    }

    async fn adjust_following_count(
        &self,
        id: &UserId,
        delta: CounterDelta,
    ) -> Result<(), UserStoreError> {
        self.adjust(id, "following_count", delta, |counts| FollowCounts {
            following: delta.apply_floored(counts.following),
            ..counts
        })
        .await;
        Ok(())
    }
}

/// Follow store holding edges keyed by `(follower, following)`.
#[derive(Debug, Default)]
pub struct InMemoryFollowStore {
    edges: Mutex<HashMap<(UserId, UserId), FollowRelationship>>,
}

impl InMemoryFollowStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored edges.
    pub async fn len(&self) -> usize {
        self.edges.lock().await.len()
    }

    /// Whether the store holds no edges.
    pub async fn is_empty(&self) -> bool {
        self.edges.lock().await.is_empty()
    }
}

#[async_trait]
impl FollowStore for InMemoryFollowStore {
    async fn find_relationship(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<Option<FollowRelationship>, FollowStoreError> {
        let key = (follower_id.clone(), following_id.clone());
        Ok(self.edges.lock().await.get(&key).cloned())
    }

    async fn create_relationship(
        &self,
        relationship: &FollowRelationship,
    ) -> Result<(), FollowStoreError> {
        let key = (
            relationship.follower_id().clone(),
            relationship.following_id().clone(),
        );
        let mut edges = self.edges.lock().await;
        if edges.contains_key(&key) {
            return Err(FollowStoreError::duplicate());
        }
        edges.insert(key, relationship.clone());
        Ok(())
    }

    async fn delete_relationship(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, FollowStoreError> {
        let key = (follower_id.clone(), following_id.clone());
        Ok(self.edges.lock().await.remove(&key).is_some())
    }
}

#[derive(Debug)]
struct Account {
    username: String,
    password: String,
    user_id: UserId,
}

/// Login service checking credentials against registered accounts.
#[derive(Debug, Default)]
pub struct InMemoryLoginService {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryLoginService {
    /// Create a service with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that authenticates as `user_id`.
    pub async fn register(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        user_id: UserId,
    ) {
        self.accounts.lock().await.push(Account {
            username: username.into(),
            password: password.into(),
            user_id,
        });
    }
}

#[async_trait]
impl LoginService for InMemoryLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        self.accounts
            .lock()
            .await
            .iter()
            .find(|account| credentials.matches(&account.username, &account.password))
            .map(|account| account.user_id.clone())
            .ok_or_else(|| Error::unauthenticated(INVALID_CREDENTIALS_MESSAGE))
    }
}
