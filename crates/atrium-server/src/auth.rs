use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use atrium_core::error::AppError;
use atrium_core::models::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user id.
    pub sub: String,
    pub roles: Vec<Role>,
    pub exp: usize,
}

/// Sign an access token for the given subject and roles.
pub fn issue_token(
    sub: &str,
    roles: &[Role],
    secret: &str,
    ttl_secs: i64,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: sub.to_string(),
        roles: roles.to_vec(),
        exp: (Utc::now().timestamp() + ttl_secs) as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
}

/// Verify and decode an access token. Fails closed: any decode or expiry
/// failure is an authentication error.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired access token".into()))
}

/// Access is granted when the route requires no roles, or when the token
/// carries at least one of the required roles.
pub fn check_roles(required: &[Role], granted: &[Role]) -> bool {
    required.is_empty() || required.iter().any(|role| granted.contains(role))
}

/// Middleware guarding a route with a required role set.
///
/// Verifies the bearer token, checks the role intersection, and makes the
/// decoded [`Claims`] available to handlers through request extensions.
pub async fn authorize(
    State((state, required)): State<(Arc<AppState>, &'static [Role])>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let claims = verify_token(token, &state.config.jwt_secret)?;

    if !check_roles(required, &claims.roles) {
        return Err(AppError::Forbidden("Insufficient role for this resource".into()).into());
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

    let header = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed Authorization header".into()))?;

    let token = header
        .strip_prefix("Bearer")
        .ok_or_else(|| {
            AppError::Unauthorized("Malformed Authorization header. Expected: Bearer <token>".into())
        })?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Empty bearer token".into()));
    }

    Ok(token)
}
