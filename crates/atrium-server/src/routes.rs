use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth;
use crate::controllers::{self, Access};
use crate::dto::HealthResponse;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router: the static route registry nested under the API
/// prefix, the public health endpoint, and — outside production — the
/// interactive API documentation at `/api-docs`.
pub fn router(state: Arc<AppState>) -> Router {
    let mut api = Router::new();
    for spec in controllers::registry() {
        let route = Router::new().route(spec.path, spec.handler);
        let route = match spec.access {
            Access::Anonymous => route,
            Access::Authenticated(required) => route.layer(middleware::from_fn_with_state(
                (state.clone(), required),
                auth::authorize,
            )),
        };
        api = api.merge(route);
    }

    let mut app = Router::new()
        .route("/health", get(health))
        .nest(state.config.api_prefix.as_str(), api);

    if !state.config.production {
        app = app.merge(
            SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app.with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(HealthResponse {
                status: "healthy",
                database: "ok",
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            axum::Json(HealthResponse {
                status: "unhealthy",
                database: "error",
            }),
        ),
    }
}
