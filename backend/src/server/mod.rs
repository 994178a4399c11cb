//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};
pub use state_builders::{DEMO_TAG_CODE, build_http_state, diesel_ports, memory_ports};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::associate::{associate_tag, prepare_association};
use crate::inbound::http::auth::{login, logout, sign_up};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::pets::{create_pet, delete_pet, get_pet, list_pets, update_pet};
use crate::inbound::http::privacy::{get_privacy, update_privacy};
use crate::inbound::http::profile::{get_profile, update_profile};
use crate::inbound::http::scan::{capture_location, contact_owner, scan_tag};
use crate::inbound::http::send_email::send_email;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tags::{issue_tags, tag_artwork};

const SESSION_COOKIE_NAME: &str = "session";

/// Shared state and session settings cloned into each worker's `App`.
#[derive(Clone)]
pub struct AppDependencies {
    /// Probe flags.
    pub health_state: web::Data<HealthState>,
    /// Port implementations behind the handlers.
    pub http_state: web::Data<HttpState>,
    /// Cookie signing and encryption key.
    pub key: Key,
    /// Whether cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// Cookie `SameSite` policy.
    pub same_site: SameSite,
}

/// Assemble the application: the `/api/v1` scope behind the cookie session,
/// the notification endpoint, health probes and, in debug builds, Swagger UI.
///
/// Integration tests drive this directly with [`actix_web::test::init_service`].
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(sign_up)
        .service(login)
        .service(logout)
        .service(get_profile)
        .service(update_profile)
        .service(list_pets)
        .service(create_pet)
        .service(get_privacy)
        .service(update_privacy)
        .service(get_pet)
        .service(update_pet)
        .service(delete_pet)
        .service(prepare_association)
        .service(associate_tag)
        .service(scan_tag)
        .service(capture_location)
        .service(contact_owner)
        .service(issue_tags)
        .service(tag_artwork);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(send_email)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding, and optional metrics settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when wiring adapters, binding the socket or
/// starting the server fails. With the `metrics` feature enabled a missing
/// Prometheus registry is also an error.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(
        &config.settings,
        config.db_pool.as_ref(),
    )?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        settings: _,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let prometheus = prometheus
        .ok_or_else(|| std::io::Error::other("metrics feature enabled without a registry"))?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
