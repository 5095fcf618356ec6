//! Account domain service.
//!
//! Implements the [`UserDirectory`] and [`AuthenticationGate`] driving ports
//! on top of the user repository, the password hasher, and the token codec.
//! Tokens carry the subject id and role, but the gate always re-reads the
//! account so the attached role is the stored one.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AccessTokenCodec, AuthenticationGate, PasswordHasher, PasswordHasherError, TokenError,
    UserDirectory, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccessToken, AuthSession, Caller, EmailAddress, Error, LoginCredentials, NewAccount, Password,
    PersonName, ProfileUpdate, Registration, Role, TokenClaims, User,
};

const INVALID_LOGIN: &str = "invalid email or password";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("email already registered")
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Expired => Error::unauthorized("token expired"),
        TokenError::Invalid { .. } => Error::unauthorized("invalid token"),
        TokenError::Signing { message } => Error::internal(format!("token signing failed: {message}")),
    }
}

/// Lifetime of issued access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    ttl: TimeDelta,
}

impl TokenPolicy {
    /// Default lifetime: seven days.
    pub const DEFAULT_HOURS: u32 = 168;

    /// Tokens live for `hours`.
    #[must_use]
    pub fn from_hours(hours: u32) -> Self {
        Self {
            ttl: TimeDelta::hours(i64::from(hours)),
        }
    }

    /// Configured lifetime.
    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::from_hours(Self::DEFAULT_HOURS)
    }
}

/// Account service implementing the user directory and authentication gate.
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    policy: TokenPolicy,
}

impl<U, H, T> AccountService<U, H, T> {
    /// Create a new service.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            policy,
        }
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: AccessTokenCodec,
{
    fn issue_session(&self, user: User) -> Result<AuthSession, Error> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at
            .checked_add_signed(self.policy.ttl())
            .ok_or_else(|| Error::internal("token expiry overflows the calendar"))?;
        let claims = TokenClaims {
            subject: user.id(),
            role: user.role(),
            issued_at,
            expires_at,
        };
        let token = self.tokens.issue(&claims).map_err(map_token_error)?;
        Ok(AuthSession {
            user,
            token: AccessToken { token, expires_at },
        })
    }

    async fn create_account(
        &self,
        email: &EmailAddress,
        name: &PersonName,
        password: &Password,
        role: Role,
    ) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(password)
            .await
            .map_err(map_hasher_error)?;
        let account = NewAccount {
            email: email.clone(),
            name: name.clone(),
            role,
            password_hash,
        };
        self.users.create(&account).await.map_err(map_user_error)
    }

    /// Make sure an administrator account exists for `email`.
    ///
    /// Creates the account when missing and promotes an existing patient.
    /// An existing account keeps its password.
    pub async fn ensure_admin(
        &self,
        email: &EmailAddress,
        password: &Password,
        name: &PersonName,
    ) -> Result<User, Error> {
        let existing = self
            .users
            .find_credentials_by_email(email)
            .await
            .map_err(map_user_error)?;
        match existing {
            Some(stored) if stored.user.role().is_admin() => Ok(stored.user),
            Some(stored) => {
                let promoted = self
                    .users
                    .set_role(stored.user.id(), Role::Admin)
                    .await
                    .map_err(map_user_error)?
                    .ok_or_else(|| Error::not_found("user not found"))?;
                info!(user_id = %promoted.id(), "promoted account to administrator");
                Ok(promoted)
            }
            None => {
                let created = self
                    .create_account(email, name, password, Role::Admin)
                    .await?;
                info!(user_id = %created.id(), "created administrator account");
                Ok(created)
            }
        }
    }
}

#[async_trait]
impl<U, H, T> UserDirectory for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: AccessTokenCodec,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let user = self
            .create_account(
                registration.email(),
                registration.name(),
                registration.password(),
                Role::Patient,
            )
            .await?;
        info!(user_id = %user.id(), "registered account");
        self.issue_session(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let stored = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_LOGIN))?;
        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_LOGIN));
        }
        self.issue_session(stored.user)
    }

    async fn profile(&self, caller: Caller) -> Result<User, Error> {
        self.users
            .find_by_id(caller.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn update_profile(&self, caller: Caller, update: ProfileUpdate) -> Result<User, Error> {
        if update.is_empty() {
            return self.profile(caller).await;
        }
        self.users
            .update_profile(caller.user_id, &update)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U, H, T> AuthenticationGate for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: AccessTokenCodec,
{
    async fn authenticate(&self, bearer_token: &str) -> Result<Caller, Error> {
        let claims = self.tokens.verify(bearer_token).map_err(map_token_error)?;
        let user = self
            .users
            .find_by_id(claims.subject)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("user not found"))?;
        Ok(Caller {
            user_id: user.id(),
            role: user.role(),
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
