//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the HTTP paths, the error schema wrappers from
//! [`crate::inbound::http::schemas`] and the session cookie security scheme.
//! The document backs Swagger UI in debug builds.

use crate::inbound::http::follows::FollowResponse;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{LoginRequest, ProfileResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Inkpost backend API",
        description = "Follow graph endpoints, session login and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::follows::follow_user,
        crate::inbound::http::follows::unfollow_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        FollowResponse,
        ProfileResponse,
        LoginRequest
    )),
    tags(
        (name = "follows", description = "Follow graph mutations"),
        (name = "users", description = "User profiles"),
        (name = "session", description = "Login and logout"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
