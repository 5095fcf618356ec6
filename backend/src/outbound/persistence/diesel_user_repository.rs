//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Password hashes are only selected by [`find_credentials_by_email`]; every
//! other read goes through [`UserRow`], which has no password column.
//!
//! [`find_credentials_by_email`]: UserRepository::find_credentials_by_email

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    ContactDetails, EmailAddress, NewAccount, PasswordHash, PersonName, ProfileUpdate, Role,
    StoredCredentials, User, UserDraft, UserId,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, violated_constraint,
};
use super::models::{NewUserRow, ProfileChangeset, UserCredentialsRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Map write errors, recognising a clash on the unique email column.
fn map_write_error(error: diesel::result::Error, email: Option<&str>) -> UserPersistenceError {
    match violated_constraint(&error) {
        Some((DatabaseErrorKind::UniqueViolation, EMAIL_UNIQUE_CONSTRAINT)) => {
            UserPersistenceError::duplicate_email(email.unwrap_or_default())
        }
        _ => map_diesel_error(error),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |err: String| UserPersistenceError::query(format!("invalid user row: {err}"));
    let id = UserId::new(row.id).map_err(|err| invalid(err.to_string()))?;
    let email = EmailAddress::new(&row.email).map_err(|err| invalid(err.to_string()))?;
    let name = PersonName::new(&row.name).map_err(|err| invalid(err.to_string()))?;
    let role = row
        .role
        .parse::<Role>()
        .map_err(|err| invalid(err.to_string()))?;

    Ok(User::from(UserDraft {
        id,
        email,
        name,
        role,
        contact: ContactDetails {
            phone: row.phone,
            address: row.address,
            avatar: row.avatar,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserCredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            Ok(StoredCredentials {
                user: row_to_user(row.user)?,
                password_hash: PasswordHash::new(row.password),
            })
        })
        .transpose()
    }

    async fn create(&self, account: &NewAccount) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            email: account.email.as_str(),
            password: account.password_hash.as_str(),
            name: account.name.as_str(),
            role: account.role.as_str(),
        };
        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, Some(account.email.as_str())))?;
        row_to_user(row)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = ProfileChangeset {
            name: update.name.as_ref().map(PersonName::as_str),
            email: update.email.as_ref().map(EmailAddress::as_str),
            phone: update.phone.as_deref(),
            address: update.address.as_deref(),
            avatar: update.avatar.as_deref(),
        };
        let row = diesel::update(users::table.find(id.get()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, changeset.email))?;
        row.map(row_to_user).transpose()
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(users::table.find(id.get()))
            .set(users::role.eq(role.as_str()))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }
}
