use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString};
use axum::Extension;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use atrium_core::error::AppError;
use atrium_core::models::{NewUser, Role};
use atrium_core::validation::ensure_valid;

use crate::auth::Claims;
use crate::controllers::{Access, RouteSpec};
use crate::dto::{
    CreateUserRequest, ListUsersQuery, MeResponse, UserListResponse, UserResponse,
};
use crate::error::ApiError;
use crate::extract::{Json, Path, Query};
use crate::state::AppState;

pub fn routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::new(
            "/users",
            Access::Authenticated(&[Role::Admin]),
            get(list_users).post(create_user),
        ),
        RouteSpec::new("/users/me", Access::Authenticated(&[]), get(me)),
        RouteSpec::new(
            "/users/{id}",
            Access::Authenticated(&[Role::Admin]),
            get(get_user),
        ),
    ]
}

#[utoipa::path(
    get,
    path = "/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "List of users", body = UserListResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::FailureResponse),
        (status = 403, description = "Forbidden", body = crate::dto::FailureResponse),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(20).min(100);
    let users = state.db.user_repo().list(limit).await?;
    let total = users.len();

    let response = UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
    };

    Ok(axum::Json(response))
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed", body = crate::dto::FailureResponse),
        (status = 409, description = "Email already registered", body = crate::dto::FailureResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::FailureResponse),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_valid(&body)?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(body.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))?
        .to_string();

    let user = state
        .db
        .user_repo()
        .create(&NewUser {
            email: body.email,
            name: body.name,
            roles: body.roles,
            password_hash,
        })
        .await?;

    Ok((StatusCode::CREATED, axum::Json(UserResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "Not found", body = crate::dto::FailureResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::FailureResponse),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .user_repo()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {id}")))?;

    Ok(axum::Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Claims of the calling token", body = MeResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::FailureResponse),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn me(Extension(claims): Extension<Claims>) -> Result<impl IntoResponse, ApiError> {
    let id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AppError::Unauthorized("Token subject is not a user id".into()))?;

    Ok(axum::Json(MeResponse {
        id,
        roles: claims.roles,
    }))
}
