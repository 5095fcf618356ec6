//! Account HTTP handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"ada@example.com","password":"secret1","name":"Ada"}
//! POST /api/auth/login {"email":"ada@example.com","password":"secret1"}
//! GET /api/auth/me
//! PUT /api/auth/me {"phone":"+44 20 7946 0000"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, LoginValidationError, PersonName,
    ProfileUpdate, Registration, RegistrationValidationError, User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedCaller;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};

/// Registration body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// Login body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Partial profile update for `PUT /api/auth/me`; omitted fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
}

/// Public view of an account. Password hashes never appear here.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub name: String,
    /// `user` for patients, `admin` for clinic staff.
    #[schema(example = "user")]
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let contact = user.contact();
        Self {
            id: user.id().get(),
            email: user.email().to_string(),
            name: user.name().to_string(),
            role: user.role().to_string(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            avatar: contact.avatar.clone(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// Account plus the bearer token to use on later requests.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserResponse::from(&session.user),
            token: session.token.token,
            expires_at: session.token.expires_at.to_rfc3339(),
        }
    }
}

fn field_code(field: &str, code: &str) -> serde_json::Value {
    json!({ "field": field, "code": code })
}

fn user_field_error(err: &UserValidationError) -> (&'static str, &'static str) {
    match err {
        UserValidationError::EmptyEmail => ("email", "empty_email"),
        UserValidationError::InvalidEmail => ("email", "invalid_email"),
        UserValidationError::EmptyName => ("name", "empty_name"),
        UserValidationError::NameTooLong { .. } => ("name", "name_too_long"),
        UserValidationError::UnknownRole(_) => ("role", "unknown_role"),
    }
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = user_field_error(&err);
    Error::invalid_request(err.to_string()).with_details(field_code(field, code))
}

fn map_registration_error(err: RegistrationValidationError) -> Error {
    match err {
        RegistrationValidationError::Email(inner) | RegistrationValidationError::Name(inner) => {
            map_user_validation_error(inner)
        }
        RegistrationValidationError::PasswordTooShort { .. } => Error::invalid_request(err.to_string())
            .with_details(field_code("password", "password_too_short")),
        RegistrationValidationError::PasswordTooLong { .. } => Error::invalid_request(err.to_string())
            .with_details(field_code("password", "password_too_long")),
    }
}

fn map_login_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Email(inner) => map_user_validation_error(inner),
        LoginValidationError::EmptyPassword => Error::invalid_request(err.to_string())
            .with_details(field_code("password", "empty_password")),
    }
}

fn parse_profile_update(payload: ProfileRequest) -> Result<ProfileUpdate, Error> {
    let name = payload
        .name
        .map(PersonName::new)
        .transpose()
        .map_err(|err| invalid_field_error(FieldName::new("name"), err))?;
    let email = payload
        .email
        .map(EmailAddress::new)
        .transpose()
        .map_err(|err| invalid_field_error(FieldName::new("email"), err))?;
    Ok(ProfileUpdate {
        name,
        email,
        phone: payload.phone,
        address: payload.address,
        avatar: payload.avatar,
    })
}

/// Create a patient account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Envelope<AuthResponse>),
        (status = 400, description = "Invalid registration", body = ErrorEnvelopeSchema),
        (status = 409, description = "Email already registered", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(&email, &password, &name).map_err(map_registration_error)?;
    let session = state.accounts.register(registration).await?;
    Ok(Envelope::with_message("Registration successful", AuthResponse::from(session)).created())
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = Envelope<AuthResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Invalid email or password", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password).map_err(map_login_error)?;
    let session = state.accounts.login(credentials).await?;
    Ok(Envelope::with_message("Login successful", AuthResponse::from(session)).ok())
}

/// The authenticated account.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = Envelope<UserResponse>),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser",
    security(("BearerAuth" = []))
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<HttpResponse> {
    let user = state.accounts.profile(caller.caller()).await?;
    Ok(Envelope::data(UserResponse::from(&user)).ok())
}

/// Update name, email, or contact details of the authenticated account.
#[utoipa::path(
    put,
    path = "/api/auth/me",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = Envelope<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 409, description = "Email already registered", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "updateCurrentUser",
    security(("BearerAuth" = []))
)]
#[put("/auth/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<HttpResponse> {
    let update = parse_profile_update(payload.into_inner())?;
    let user = state
        .accounts
        .update_profile(caller.caller(), update)
        .await?;
    Ok(Envelope::with_message("Profile updated", UserResponse::from(&user)).ok())
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
