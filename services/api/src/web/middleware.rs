//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::web::state::AppState;
use crate::web::tokens::TokenError;

/// The verified identity the auth gate resolved for this request.
///
/// Handlers must take their account id from here and never from the request
/// body, so a caller can only ever act on their own data.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Middleware that validates the bearer token and extracts the caller's identity.
///
/// If valid, inserts an `AuthUser` into request extensions for handlers to use.
/// A missing token yields 401; an invalid or expired one yields 403, matching
/// the client's diagnostics split.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<Value>)> {
    // 1. Extract the token from `Authorization: Bearer <token>`.
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Access denied, token missing", "isLoggedIn": false })),
        ))?;

    // 2. Verify signature and expiry.
    let claims = state.tokens.verify(token).map_err(|e: TokenError| {
        (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": e.to_string(), "isLoggedIn": false })),
        )
    })?;

    // 3. Insert the resolved identity into request extensions.
    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
    });

    // 4. Continue to the handler.
    Ok(next.run(req).await)
}
