use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordVerifier};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;

use atrium_core::error::AppError;
use atrium_core::validation::ensure_valid;

use crate::auth;
use crate::controllers::{Access, RouteSpec};
use crate::dto::{LoginRequest, LoginResponse, UserResponse};
use crate::error::ApiError;
use crate::extract::Json;
use crate::state::AppState;

pub fn routes() -> Vec<RouteSpec> {
    vec![RouteSpec::new("/sessions", Access::Anonymous, post(login))]
}

#[utoipa::path(
    post,
    path = "/sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 400, description = "Validation failed", body = crate::dto::FailureResponse),
        (status = 401, description = "Unknown email or wrong password", body = crate::dto::FailureResponse),
    ),
    security(()),
    tag = "sessions"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_valid(&body)?;

    // Same error for unknown email and wrong password.
    let denied = || AppError::Unauthorized("Invalid email or password".into());

    let credentials = state
        .db
        .user_repo()
        .credentials_by_email(&body.email)
        .await?
        .ok_or_else(denied)?;

    let parsed = PasswordHash::new(&credentials.password_hash)
        .map_err(|e| AppError::Internal(format!("Corrupt password hash: {e}")))?;
    Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed)
        .map_err(|_| denied())?;

    let user = credentials.user;
    let access_token = auth::issue_token(
        &user.id.to_string(),
        &user.roles,
        &state.config.jwt_secret,
        state.config.jwt_ttl_secs,
    )?;

    Ok(axum::Json(LoginResponse {
        access_token,
        user: UserResponse::from(user),
    }))
}
