//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`])
//!   that provide OpenAPI definitions without coupling domain types to the
//!   utoipa framework
//! - **Security**: session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
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
                "Session cookie issued by POST /api/v1/auth/login",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tag Pet API",
        description = "Owner accounts, pets and QR tags, plus the public flow used by whoever finds a lost pet."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::pets::list_pets,
        crate::inbound::http::pets::create_pet,
        crate::inbound::http::pets::get_pet,
        crate::inbound::http::pets::update_pet,
        crate::inbound::http::pets::delete_pet,
        crate::inbound::http::privacy::get_privacy,
        crate::inbound::http::privacy::update_privacy,
        crate::inbound::http::associate::prepare_association,
        crate::inbound::http::associate::associate_tag,
        crate::inbound::http::scan::scan_tag,
        crate::inbound::http::scan::capture_location,
        crate::inbound::http::scan::contact_owner,
        crate::inbound::http::send_email::send_email,
        crate::inbound::http::tags::issue_tags,
        crate::inbound::http::tags::tag_artwork,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "accounts", description = "Sign up, sign in and sign out"),
        (name = "profile", description = "Owner contact details"),
        (name = "pets", description = "Pets owned by the signed-in account"),
        (name = "privacy", description = "What finders may see about a pet's owner"),
        (name = "tags", description = "Tag issuance, artwork and association"),
        (name = "scan", description = "Public scan flow for finders"),
        (name = "notifications", description = "Direct found-pet emails"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
