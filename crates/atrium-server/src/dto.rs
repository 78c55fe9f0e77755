use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_core::error::FieldFailure;
use atrium_core::models::{Role, User};
use atrium_core::validation::Validate;

// ---------------------------------------------------------------------------
// Failure envelope
// ---------------------------------------------------------------------------

/// Uniform failure envelope returned for every error response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    pub error_message: String,
    /// Present only for request-validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<ValidationErrorBody>>,
}

/// One field-level validation failure, annotated with the validated type.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ValidationErrorBody {
    pub target: String,
    pub property: String,
    pub message: String,
}

impl From<&FieldFailure> for ValidationErrorBody {
    fn from(failure: &FieldFailure) -> Self {
        Self {
            target: failure.target.to_string(),
            property: failure.property.clone(),
            message: failure.message.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[schema(value_type = Vec<String>)]
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            roles: user.roles,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListUsersQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub roles: Vec<Role>,
}

impl Validate for CreateUserRequest {
    const TARGET: &'static str = "CreateUserRequest";

    fn validate(&self) -> Vec<FieldFailure> {
        let mut failures = Vec::new();

        if self.email.trim().is_empty() {
            failures.push(FieldFailure::new(
                Self::TARGET,
                "email",
                "email must not be empty",
            ));
        } else if !self.email.contains('@') {
            failures.push(FieldFailure::new(
                Self::TARGET,
                "email",
                "email must be a valid email address",
            ));
        }

        if self.name.trim().is_empty() {
            failures.push(FieldFailure::new(
                Self::TARGET,
                "name",
                "name must not be empty",
            ));
        }

        if self.password.len() < 8 {
            failures.push(FieldFailure::new(
                Self::TARGET,
                "password",
                "password must be at least 8 characters",
            ));
        }

        failures
    }
}

/// Claims of the calling token, echoed back without a database lookup.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub id: Uuid,
    #[schema(value_type = Vec<String>)]
    pub roles: Vec<Role>,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    const TARGET: &'static str = "LoginRequest";

    fn validate(&self) -> Vec<FieldFailure> {
        let mut failures = Vec::new();

        if self.email.trim().is_empty() {
            failures.push(FieldFailure::new(
                Self::TARGET,
                "email",
                "email must not be empty",
            ));
        }

        if self.password.is_empty() {
            failures.push(FieldFailure::new(
                Self::TARGET,
                "password",
                "password must not be empty",
            ));
        }

        failures
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}
