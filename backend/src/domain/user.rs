//! Patient and administrator accounts.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::serial_id::define_serial_id;

/// Validation errors raised by user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The email address was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email address failed the shape check.
    #[error("email must be a valid email address")]
    InvalidEmail,
    /// The display name was blank.
    #[error("name must not be empty")]
    EmptyName,
    /// The display name exceeded the column width.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Maximum allowed characters.
        max: usize,
    },
    /// The stored role was neither `user` nor `admin`.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

define_serial_id! {
    /// Database-assigned user identifier.
    ///
    /// # Examples
    /// ```
    /// use careplus::domain::UserId;
    ///
    /// assert_eq!(UserId::new(7).expect("positive").get(), 7);
    /// assert!(UserId::new(0).is_err());
    /// ```
    UserId => "user"
}

/// Normalised (trimmed, lower-cased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

/// Maximum stored email length.
pub const EMAIL_MAX: usize = 255;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// # Panics
///
/// Panics only if the literal pattern fails to compile.
fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl EmailAddress {
    /// Normalise and validate an email address.
    ///
    /// # Examples
    /// ```
    /// use careplus::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Ada@Example.COM ").expect("valid");
    /// assert_eq!(email.as_str(), "ada@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX || !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human readable name shown on appointments and profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

/// Maximum stored name length.
pub const PERSON_NAME_MAX: usize = 255;

impl PersonName {
    /// Trim and validate a display name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access role. Persisted as `user` for patients and `admin` for staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A patient who books appointments.
    Patient,
    /// Clinic staff managing the doctor directory.
    Admin,
}

impl Role {
    /// Storage and token representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "user",
            Self::Admin => "admin",
        }
    }

    /// Whether the role may mutate the doctor directory and see all bookings.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::Patient),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Optional contact fields attached to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    /// Phone number as entered.
    pub phone: Option<String>,
    /// Postal address as entered.
    pub address: Option<String>,
    /// Avatar image reference.
    pub avatar: Option<String>,
}

/// A registered account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: PersonName,
    role: Role,
    contact: ContactDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field bundle used to construct a [`User`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Identifier.
    pub id: UserId,
    /// Normalised email.
    pub email: EmailAddress,
    /// Display name.
    pub name: PersonName,
    /// Access role.
    pub role: Role,
    /// Optional contact fields.
    pub contact: ContactDetails,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<UserDraft> for User {
    fn from(draft: UserDraft) -> Self {
        let UserDraft {
            id,
            email,
            name,
            role,
            contact,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            email,
            name,
            role,
            contact,
            created_at,
            updated_at,
        }
    }
}

impl User {
    /// Identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
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

    /// Access role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Optional contact fields.
    #[must_use]
    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    /// Replacement display name.
    pub name: Option<PersonName>,
    /// Replacement email (uniqueness is checked by the account service).
    pub email: Option<EmailAddress>,
    /// Replacement phone.
    pub phone: Option<String>,
    /// Replacement address.
    pub address: Option<String>,
    /// Replacement avatar reference.
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// True when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.avatar.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user", Role::Patient)]
    #[case("admin", Role::Admin)]
    fn roles_parse_from_storage_strings(#[case] raw: &str, #[case] expected: Role) {
        let role: Role = raw.parse().expect("known role");
        assert_eq!(role, expected);
        assert_eq!(role.as_str(), raw);
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        let err = "doctor".parse::<Role>().expect_err("unknown role");
        assert_eq!(err, UserValidationError::UnknownRole("doctor".to_owned()));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_email_is_empty(#[case] raw: &str) {
        assert_eq!(EmailAddress::new(raw), Err(UserValidationError::EmptyEmail));
    }

    #[rstest]
    #[case("plainaddress")]
    #[case("missing@tld")]
    #[case("two words@example.com")]
    #[case("@example.com")]
    fn malformed_email_is_invalid(#[case] raw: &str) {
        assert_eq!(EmailAddress::new(raw), Err(UserValidationError::InvalidEmail));
    }

    #[rstest]
    fn name_is_trimmed() {
        let name = PersonName::new("  Ivan Petrov ").expect("valid name");
        assert_eq!(name.as_str(), "Ivan Petrov");
    }

    #[rstest]
    fn overlong_name_is_rejected() {
        let raw = "a".repeat(PERSON_NAME_MAX + 1);
        assert_eq!(
            PersonName::new(raw),
            Err(UserValidationError::NameTooLong {
                max: PERSON_NAME_MAX
            })
        );
    }

    #[rstest]
    fn empty_profile_update_is_detected() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate {
            phone: Some("+7 900 000 00 00".to_owned()),
            ..ProfileUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
