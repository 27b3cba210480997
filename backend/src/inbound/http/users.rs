//! Account handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Asha Rao","email":"asha@example.com","password":"secret","phone":"+919876543210"}
//! POST /api/v1/auth/login {"email":"asha@example.com","password":"secret"}
//! GET  /api/v1/auth/profile/1
//! PUT  /api/v1/auth/profile/1 {"phone":"+918888888888"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::Deserialize;

use crate::domain::{
    AuthenticatedSession, Error, FullName, LoginCredentials, PhoneNumber, ProfileUpdate,
    Registration, User, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_login_validation_error, map_user_validation_error, parse_id,
};

const USER_ID: FieldName = FieldName::new("userId");

/// Registration body for `POST /api/v1/auth/register`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "secret-pass")]
    pub password: String,
    #[schema(example = "+919876543210")]
    pub phone: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.email, &value.password, &value.phone)
            .map_err(map_user_validation_error)
    }
}

/// Login body for `POST /api/v1/auth/login`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "secret-pass")]
    pub password: String,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Deserialize, utoipa::ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl TryFrom<ProfileUpdateRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(value: ProfileUpdateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value
                .name
                .map(FullName::new)
                .transpose()
                .map_err(map_user_validation_error)?,
            phone: value
                .phone
                .map(PhoneNumber::new)
                .transpose()
                .map_err(map_user_validation_error)?,
        })
    }
}

/// Create a guest account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid input or duplicate email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
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
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    Ok(created(user, "user registered"))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthenticatedSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
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
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_login_validation_error)?;
    let session = state.accounts.login(credentials).await?;
    Ok(ok(session, "login successful"))
}

/// Fetch a guest profile.
#[utoipa::path(
    get,
    path = "/api/v1/auth/profile/{userId}",
    params(("userId" = i64, Path, description = "Guest identifier")),
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["auth"],
    operation_id = "getProfile"
)]
#[get("/auth/profile/{user_id}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user_id: UserId = parse_id(path.into_inner(), USER_ID)?;
    let user = state.profiles.profile(user_id).await?;
    Ok(ok(user, "profile fetched"))
}

/// Update a guest's name or phone.
#[utoipa::path(
    put,
    path = "/api/v1/auth/profile/{userId}",
    params(("userId" = i64, Path, description = "Guest identifier")),
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updateProfile"
)]
#[put("/auth/profile/{user_id}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let user_id: UserId = parse_id(path.into_inner(), USER_ID)?;
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let user = state.accounts.update_profile(user_id, update).await?;
    Ok(ok(user, "profile updated"))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
