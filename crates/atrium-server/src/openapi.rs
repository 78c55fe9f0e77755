use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atrium API",
        version = "0.1.0",
        description = "REST API service with JWT role-based authorization."
    ),
    paths(
        crate::controllers::sessions::login,
        crate::controllers::users::list_users,
        crate::controllers::users::create_user,
        crate::controllers::users::get_user,
        crate::controllers::users::me,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::LoginRequest,
        crate::dto::LoginResponse,
        crate::dto::CreateUserRequest,
        crate::dto::UserResponse,
        crate::dto::UserListResponse,
        crate::dto::MeResponse,
        crate::dto::HealthResponse,
        crate::dto::FailureResponse,
        crate::dto::ValidationErrorBody,
    )),
    tags(
        (name = "sessions", description = "Login and token issuance"),
        (name = "users", description = "User management"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds the Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from POST /sessions."))
                        .build(),
                ),
            );
        }
    }
}
