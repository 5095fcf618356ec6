//! Authentication primitives: credentials, registrations, and token claims.
//!
//! Inbound adapters parse raw strings into these types before calling the
//! account service, so validation lives in one place and secrets are wiped
//! from memory when dropped.

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::Error;
use super::user::{EmailAddress, PersonName, Role, User, UserId, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;
/// bcrypt ignores input past 72 bytes; longer passwords are rejected.
pub const PASSWORD_MAX_BYTES: usize = 72;

/// Why a login payload was rejected before any lookup happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    #[error("{0}")]
    Email(UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Why a registration payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Email was missing or malformed.
    #[error("{0}")]
    Email(UserValidationError),
    /// Name was missing or too long.
    #[error("{0}")]
    Name(UserValidationError),
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length.
        min: usize,
    },
    /// Password longer than bcrypt accepts.
    #[error("password must be at most {max} bytes")]
    PasswordTooLong {
        /// Maximum length in bytes.
        max: usize,
    },
}

/// Plain-text password held only as long as needed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    fn new(raw: &str) -> Self {
        Self(Zeroizing::new(raw.to_owned()))
    }

    /// Expose the secret for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

fn check_password_strength(raw: &str) -> Result<(), RegistrationValidationError> {
    if raw.chars().count() < PASSWORD_MIN {
        return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    if raw.len() > PASSWORD_MAX_BYTES {
        return Err(RegistrationValidationError::PasswordTooLong {
            max: PASSWORD_MAX_BYTES,
        });
    }
    Ok(())
}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use careplus::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com", "secret").expect("valid");
/// assert_eq!(creds.email().as_str(), "ada@example.com");
/// assert_eq!(creds.password().expose(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(LoginValidationError::Email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Password::new(password),
        })
    }

    /// Normalised email used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Caller supplied password.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated self-service registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    name: PersonName,
    password: Password,
}

impl Registration {
    /// Validate raw registration inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let email = EmailAddress::new(email).map_err(RegistrationValidationError::Email)?;
        check_password_strength(password)?;
        let name = PersonName::new(name).map_err(RegistrationValidationError::Name)?;
        Ok(Self {
            email,
            name,
            password: Password::new(password),
        })
    }

    /// Normalised email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Chosen password.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// An opaque one-way password hash as stored in `users.password`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored hash.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// Account row paired with its stored hash, as loaded for login.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    /// The account.
    pub user: User,
    /// Its password hash.
    pub password_hash: PasswordHash,
}

/// New account ready to persist.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Normalised email.
    pub email: EmailAddress,
    /// Display name.
    pub name: PersonName,
    /// Access role.
    pub role: Role,
    /// Hash of the chosen password.
    pub password_hash: PasswordHash,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    /// Account the token was issued to.
    pub subject: UserId,
    /// Role at issue time. The gate re-reads the role from storage.
    pub role: Role,
    /// Issue instant.
    pub issued_at: DateTime<Utc>,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// Signed bearer token handed to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Encoded token.
    pub token: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The authenticated account.
    pub user: User,
    /// Token for subsequent requests.
    pub token: AccessToken,
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Account id.
    pub user_id: UserId,
    /// Current role, freshly loaded.
    pub role: Role,
}

impl Caller {
    /// Reject anyone but clinic staff.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("administrator access required"))
        }
    }

    /// Reject anyone but patients.
    pub fn require_patient(&self) -> Result<(), Error> {
        match self.role {
            Role::Patient => Ok(()),
            Role::Admin => Err(Error::forbidden("only patients can book appointments")),
        }
    }
}
