//! services/api/src/web/accounts.rs
//!
//! Account endpoints: signup, login, session check, identity, update, delete.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;
use vocab_core::ports::PortError;

use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub email: String,
    /// An empty string leaves the current password untouched.
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct SignupResponse {
    pub message: String,
    pub data: AccountResponse,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

type HandlerError = (StatusCode, Json<Value>);

fn validation_error() -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "All fields are required." })),
    )
}

fn internal_error() -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error." })),
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /accounts/session - Report whether the presented token is valid.
///
/// The auth gate has already verified the token by the time this runs.
#[utoipa::path(
    get,
    path = "/accounts/session",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Token missing"),
        (status = 403, description = "Token invalid or expired")
    )
)]
pub async fn session_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "message": "User logged in", "isLoggedIn": true })),
    )
}

/// GET /accounts - Return the identity resolved from the token.
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "Identity retrieved"),
        (status = 401, description = "Token missing"),
        (status = 403, description = "Token invalid or expired")
    )
)]
pub async fn identity_handler(Extension(user): Extension<AuthUser>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "message": "User data retrieved successfully.",
            "data": { "id": user.id, "email": user.email },
        })),
    )
}

/// POST /accounts/signup - Create a new account.
#[utoipa::path(
    post,
    path = "/accounts/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created successfully", body = SignupResponse),
        (status = 400, description = "Missing email or password"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    // 1. Validate at the boundary, before any store access.
    if req.email.is_empty() || req.password.is_empty() {
        return Err(validation_error());
    }

    // 2. Hash the password.
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            internal_error()
        })?
        .to_string();

    // 3. Persist the account. A taken email is a distinct 409.
    let account = state
        .db
        .create_account(&req.email, &password_hash)
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Email is already registered." })),
            ),
            e => {
                error!("Failed to create account: {:?}", e);
                internal_error()
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Registration successful.".to_string(),
            data: AccountResponse {
                id: account.id,
                email: account.email,
                created_at: account.created_at,
            },
        }),
    ))
}

/// POST /accounts/login - Verify credentials and issue a session token.
#[utoipa::path(
    post,
    path = "/accounts/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(validation_error());
    }

    // Unknown email and wrong password produce the same error, so a probe
    // cannot learn whether an account exists.
    let invalid_credentials = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Email or password are wrong." })),
        )
    };

    let creds = state
        .db
        .get_account_by_email(&req.email)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => invalid_credentials(),
            e => {
                error!("Failed to look up account: {:?}", e);
                internal_error()
            }
        })?;

    let parsed_hash = PasswordHash::new(&creds.password_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        internal_error()
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err(invalid_credentials());
    }

    let token = state.tokens.issue(creds.id, &creds.email).map_err(|e| {
        error!("Failed to issue token: {:?}", e);
        internal_error()
    })?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
        }),
    ))
}

/// POST /accounts/update - Replace the email, and the password when supplied.
#[utoipa::path(
    post,
    path = "/accounts/update",
    request_body = UpdateAccountRequest,
    responses(
        (status = 201, description = "Account updated successfully"),
        (status = 400, description = "Missing email"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.email.is_empty() {
        return Err(validation_error());
    }

    // An empty password means "keep the existing hash".
    let password_hash = if req.password.is_empty() {
        None
    } else {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| {
                error!("Failed to hash password: {:?}", e);
                internal_error()
            })?
            .to_string();
        Some(hash)
    };

    state
        .db
        .update_account(user.id, &req.email, password_hash.as_deref())
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Email is already registered." })),
            ),
            e => {
                error!("Failed to update account: {:?}", e);
                internal_error()
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account updated successfully." })),
    ))
}

/// DELETE /accounts - Delete the calling account and everything it owns.
#[utoipa::path(
    delete,
    path = "/accounts",
    responses(
        (status = 201, description = "Account deleted successfully"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HandlerError> {
    state.db.delete_account(user.id).await.map_err(|e| {
        error!("Failed to delete account: {:?}", e);
        internal_error()
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account deleted successful." })),
    ))
}
