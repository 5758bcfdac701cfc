//! OpenAPI documentation for the HTTP API, served at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Bearer security scheme: protected routes expect the access token from
/// `/auth/login` in the `Authorization` header.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token authentication. Obtain a token pair from `/auth/login` \
                            and send the access token on every protected request:\n\n\
                            ```\nAuthorization: Bearer YOUR_ACCESS_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::signup,
        api::handlers::auth::login,
        api::handlers::profile::read_profile,
        api::handlers::categories::list_categories,
        api::handlers::categories::create_category,
        api::handlers::categories::modify_category,
        api::handlers::categories::delete_category,
        api::handlers::daily_todos::create_daily_todo,
        api::handlers::daily_todos::read_daily_todo,
        api::handlers::daily_todos::list_daily_todos,
        api::handlers::daily_todos::modify_daily_todo,
        api::handlers::daily_todos::delete_daily_todo,
        api::handlers::due_date_todos::create_due_date_todo,
        api::handlers::due_date_todos::read_due_date_todo,
        api::handlers::due_date_todos::list_due_date_todos,
        api::handlers::due_date_todos::modify_due_date_todo,
        api::handlers::due_date_todos::delete_due_date_todo,
    ),
    components(schemas(
        api::models::users::SignupRequest,
        api::models::users::SignupResponse,
        api::models::users::LoginRequest,
        api::models::users::TokenPairResponse,
        api::models::users::ProfileResponse,
        api::models::categories::CategorySaveRequest,
        api::models::categories::CategoryResponse,
        api::models::categories::CategoryCreatedResponse,
        api::models::todos::DailyTodoCreateRequest,
        api::models::todos::DailyTodoModifyRequest,
        api::models::todos::DailyTodoResponse,
        api::models::todos::DueDateTodoCreateRequest,
        api::models::todos::DueDateTodoModifyRequest,
        api::models::todos::DueDateTodoResponse,
        api::models::todos::TodoCreatedResponse,
        crate::types::Importance,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "profile", description = "Public profile lookup"),
        (name = "categories", description = "Per-user todo categories"),
        (name = "daily-todos", description = "Todos scheduled on a calendar day"),
        (name = "due-date-todos", description = "Todos tracked by deadline and importance"),
    ),
    info(
        title = "todoay API",
        description = "Multi-user todo tracking backend with stateless token auth"
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        let json = spec.to_json().expect("spec should serialize");
        assert!(json.contains("/auth/login"));
        assert!(json.contains("/api/v1/daily-todos"));
        assert!(json.contains("BearerAuth"));
    }

    /// Docs must show the todo/category routes as token-protected and the
    /// auth/profile routes as open.
    #[test]
    fn test_protected_paths_declare_bearer_auth() {
        let spec = ApiDoc::openapi();
        let json: serde_json::Value = serde_json::from_str(&spec.to_json().unwrap()).unwrap();

        for (path, method) in [
            ("/api/v1/categories", "get"),
            ("/api/v1/categories/{id}", "delete"),
            ("/api/v1/daily-todos", "post"),
            ("/api/v1/daily-todos/{id}", "put"),
            ("/api/v1/due-date-todos", "get"),
            ("/api/v1/due-date-todos/{id}", "delete"),
        ] {
            let security = &json["paths"][path][method]["security"];
            assert_eq!(
                security[0]["BearerAuth"],
                serde_json::json!([]),
                "{method} {path} should require BearerAuth"
            );
        }

        for (path, method) in [("/auth/login", "post"), ("/auth/signup", "post"), ("/profile/{nickname}", "get")] {
            assert!(
                json["paths"][path][method]["security"].is_null(),
                "{method} {path} should be public"
            );
        }
    }
}
