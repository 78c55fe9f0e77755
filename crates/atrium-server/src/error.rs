use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use atrium_core::error::AppError;

use crate::dto::{FailureResponse, ValidationErrorBody};

/// Wrapper so we can implement `IntoResponse` for `AppError`.
///
/// This is the single place response shape is unified: every error surfaced
/// by a handler or middleware passes through here, is logged exactly once,
/// and leaves as the failure envelope with its mapped status code.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self.0);

        let status = match &self.0 {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let validation_errors = match &self.0 {
            AppError::Validation(failures) => Some(
                failures
                    .iter()
                    .map(ValidationErrorBody::from)
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        };

        let body = FailureResponse {
            error_message: self.0.to_string(),
            validation_errors,
        };

        (status, axum::Json(body)).into_response()
    }
}
