//! Authentication API handlers.
//!
//! ```text
//! POST /v1/authentication/user  {"username":"frodo","email":"frodo@example.com","password":"secret"}
//! POST /v1/authentication/token {"email":"frodo@example.com","password":"secret"}
//! PUT  /v1/users/activate/{token}
//! ```

use actix_web::{HttpResponse, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::credentials::verify_password;
use crate::domain::ports::StoreError;
use crate::domain::registration::RegisterRequest;
use crate::domain::user::User;
use crate::domain::{ApiResult, Error};
use crate::inbound::http::state::HttpState;

const MAX_USERNAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 3;
const MAX_PASSWORD_LEN: usize = 72;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration response: the created account plus its one-time activation
/// token. The token is never persisted in cleartext.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

/// Fold an absent account into the generic credential rejection; store
/// failures keep their own classification so an outage is not reported
/// as a bad password.
fn credential_lookup_error(error: StoreError) -> Error {
    match error {
        StoreError::NotFound => Error::unauthorized("invalid credentials"),
        other => other.into(),
    }
}

fn validate_register(payload: &RegisterPayload) -> Result<(), Error> {
    if payload.username.is_empty() || payload.username.len() > MAX_USERNAME_LEN {
        return Err(Error::invalid_request(format!(
            "username must be between 1 and {MAX_USERNAME_LEN} characters"
        )));
    }
    if payload.email.is_empty() || payload.email.len() > MAX_EMAIL_LEN {
        return Err(Error::invalid_request(format!(
            "email must be between 1 and {MAX_EMAIL_LEN} characters"
        )));
    }
    if !payload.email.contains('@') {
        return Err(Error::invalid_request("email must be a valid address"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN || payload.password.len() > MAX_PASSWORD_LEN {
        return Err(Error::invalid_request(format!(
            "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Register a new account and dispatch its activation invitation.
#[post("/user")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterPayload>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    validate_register(&payload)?;

    let registered = state
        .registration
        .register(RegisterRequest {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        user: registered.user,
        token: registered.plain_token,
    }))
}

/// Token request body.
#[derive(Debug, Deserialize)]
pub struct TokenPayload {
    pub email: String,
    pub password: String,
}

/// Token response body.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Exchange credentials for a bearer token.
///
/// Unknown accounts and wrong passwords are deliberately indistinguishable.
#[post("/token")]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenPayload>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(Error::invalid_request("email and password are required"));
    }

    // Reads the repository directly: cached snapshots carry no credential
    // material.
    let user = state
        .users
        .find_by_email(&payload.email)
        .await
        .map_err(credential_lookup_error)?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(Error::unauthorized("invalid credentials"));
    }

    let token = state
        .tokens
        .issue(user.id)
        .map_err(|err| Error::internal(err.to_string()))?;

    Ok(HttpResponse::Created().json(TokenResponse { token }))
}

/// Redeem an activation token, making the account visible to reads.
#[put("/activate/{token}")]
pub async fn activate(
    state: web::Data<HttpState>,
    token: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.registration.activate(&token).await?;
    Ok(HttpResponse::NoContent().finish())
}
