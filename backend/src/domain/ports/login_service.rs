//! Driving port for session login.
//!
//! Inbound adapters call it to turn credentials into a user id without knowing
//! where accounts live. The adapters behind this port are development and
//! test authenticators.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Message returned for any failed credential check.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
