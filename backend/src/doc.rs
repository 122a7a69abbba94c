//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers the blog, user, and health
//! endpoints plus the bearer-token security scheme. The generated
//! specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Bearer token issued by POST /api/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog backend API",
        description = "HTTP interface for bearer-token authenticated blog sharing."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::blogs::list_blogs,
        crate::inbound::http::blogs::create_blog,
        crate::inbound::http::blogs::update_blog,
        crate::inbound::http::blogs::delete_blog,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::inbound::http::blogs::BlogResponse,
        crate::inbound::http::blogs::OwnerSummary,
        crate::inbound::http::blogs::CreateBlogRequest,
        crate::inbound::http::blogs::UpdateBlogRequest,
        crate::inbound::http::users::RegisterRequest,
        crate::inbound::http::users::UserResponse,
        crate::inbound::http::users::OwnedBlogSummary,
        crate::inbound::http::users::LoginRequest,
        crate::inbound::http::users::LoginResponse,
    )),
    tags(
        (name = "blogs", description = "Blog creation, listing, update, and deletion"),
        (name = "users", description = "Registration and authentication"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
