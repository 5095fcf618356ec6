//! Driving port for account registration, login, and profile use-cases.

use async_trait::async_trait;

use crate::domain::{AuthSession, Caller, Error, LoginCredentials, ProfileUpdate, Registration, User};

/// Account use-cases invoked by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Create a patient account and sign it in.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check credentials and issue a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Current account of the caller.
    async fn profile(&self, caller: Caller) -> Result<User, Error>;

    /// Apply a partial update to the caller's account.
    async fn update_profile(&self, caller: Caller, update: ProfileUpdate) -> Result<User, Error>;
}
