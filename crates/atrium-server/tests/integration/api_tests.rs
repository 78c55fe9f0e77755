use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use atrium_core::models::Role;
use atrium_db::DatabaseConfig;
use atrium_server::auth;

use crate::common::{
    TEST_JWT_SECRET, UNREACHABLE_DATABASE_URL, setup_test_app, test_config, token_for,
};

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_returns_401() {
    let app = setup_test_app(false);

    let response = app
        .oneshot(Request::get("/api/users").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert!(json["errorMessage"].as_str().unwrap().contains("Authorization"));
}

#[tokio::test]
async fn garbage_token_returns_401() {
    let app = setup_test_app(false);

    let response = app
        .oneshot(
            Request::get("/api/users")
                .header("authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_required_role_returns_403() {
    let app = setup_test_app(false);

    // /api/users requires admin; a token without roles is denied.
    let response = app
        .oneshot(
            Request::get("/api/users")
                .header("authorization", format!("Bearer {}", token_for(&[])))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert!(json["errorMessage"].as_str().unwrap().contains("Forbidden"));
}

#[tokio::test]
async fn wrong_role_returns_403() {
    let app = setup_test_app(false);

    let response = app
        .oneshot(
            Request::get("/api/users")
                .header(
                    "authorization",
                    format!("Bearer {}", token_for(&[Role::User])),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn route_without_required_roles_admits_any_valid_token() {
    let app = setup_test_app(false);

    let sub = Uuid::new_v4();
    let token = auth::issue_token(&sub.to_string(), &[Role::User], TEST_JWT_SECRET, 3600).unwrap();

    let response = app
        .oneshot(
            Request::get("/api/users/me")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], sub.to_string());
    assert_eq!(json["roles"], serde_json::json!(["user"]));
}

// ---------------------------------------------------------------------------
// Error normalization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_user_validation_failure_lists_every_field() {
    let app = setup_test_app(false);

    let body = serde_json::json!({
        "email": "",
        "name": "",
        "password": "short"
    });

    // Valid admin token: the request passes authorization and fails
    // validation before touching the database.
    let response = app
        .oneshot(
            Request::post("/api/users")
                .header(
                    "authorization",
                    format!("Bearer {}", token_for(&[Role::Admin])),
                )
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let errors = json["validationErrors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| e["target"] == "CreateUserRequest"));
}

#[tokio::test]
async fn login_validation_failure_uses_failure_envelope() {
    let app = setup_test_app(false);

    let body = serde_json::json!({ "email": "", "password": "" });

    let response = app
        .oneshot(
            Request::post("/api/sessions")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["errorMessage"], "Request validation failed");
    let errors = json["validationErrors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e["target"] == "LoginRequest"));
}

#[tokio::test]
async fn malformed_json_body_uses_failure_envelope() {
    let app = setup_test_app(false);

    let response = app
        .oneshot(
            Request::post("/api/sessions")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );

    let json = body_json(response).await;
    assert!(json["errorMessage"].as_str().unwrap().contains("JSON"));
    assert!(json.get("validationErrors").is_none());
}

#[tokio::test]
async fn invalid_path_parameter_uses_failure_envelope() {
    let app = setup_test_app(false);

    let response = app
        .oneshot(
            Request::get("/api/users/not-a-uuid")
                .header(
                    "authorization",
                    format!("Bearer {}", token_for(&[Role::Admin])),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["errorMessage"].as_str().is_some());
}

#[tokio::test]
async fn database_failure_returns_500_envelope() {
    let app = setup_test_app(false);

    // Admin token passes authorization; the handler then hits the
    // unreachable database and the error is normalized to a 500 envelope.
    let response = app
        .oneshot(
            Request::get("/api/users")
                .header(
                    "authorization",
                    format!("Bearer {}", token_for(&[Role::Admin])),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert!(json["errorMessage"].as_str().unwrap().contains("Database"));
    assert!(json.get("validationErrors").is_none());
}

// ---------------------------------------------------------------------------
// Documentation exposure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_docs_registered_outside_production() {
    let app = setup_test_app(false);

    let response = app
        .clone()
        .oneshot(Request::get("/api-docs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "Atrium API");
    assert!(json["paths"].get("/users").is_some());

    // Role lists are documented as plain string arrays.
    let roles_schema = &json["components"]["schemas"]["UserResponse"]["properties"]["roles"];
    assert_eq!(roles_schema["type"], "array");
    assert_eq!(roles_schema["items"]["type"], "string");
}

#[tokio::test]
async fn api_docs_absent_in_production() {
    let app = setup_test_app(true);

    let response = app
        .clone()
        .oneshot(Request::get("/api-docs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Health & startup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_unreachable_database() {
    let app = setup_test_app(false);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["database"], "error");
}

#[tokio::test]
async fn startup_fails_when_database_is_unreachable() {
    let config = test_config(false);
    let db_config = DatabaseConfig {
        url: UNREACHABLE_DATABASE_URL.to_string(),
        max_connections: 1,
    };

    // init connects eagerly; a down database aborts startup before any
    // listener could be bound.
    let result = atrium_server::init(&config, &db_config).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = setup_test_app(false);

    let response = app
        .oneshot(Request::get("/api/widgets").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
