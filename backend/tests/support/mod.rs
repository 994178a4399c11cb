//! Shared helpers for backend integration tests.
//!
//! Tests compile as separate crates under `backend/tests/`; this module gives
//! them one way to build the full application over the in-memory adapters
//! and to exchange JSON with it.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::http::StatusCode;
use actix_web::web;
use serde_json::Value;

use tagpet::domain::TagCode;
use tagpet::inbound::http::health::HealthState;
use tagpet::inbound::http::state::HttpState;
use tagpet::outbound::memory::InMemoryStore;
use tagpet::server::{AppDependencies, AppSettings, DEMO_TAG_CODE, memory_ports};

/// Captured response: status, refreshed session cookie and JSON body.
pub struct Reply {
    pub status: StatusCode,
    pub cookie: Option<Cookie<'static>>,
    pub body: Value,
}

/// Store holding the demo tag, shared with the app so tests can inspect it.
pub fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    let code = TagCode::new(DEMO_TAG_CODE).expect("demo code");
    store.seed_tag(code).expect("seed demo tag");
    store
}

/// Full application dependencies over `store`, without any external service.
pub fn app_dependencies(store: Arc<InMemoryStore>) -> AppDependencies {
    let settings = AppSettings {
        base_url: Some("https://tagpet.example".to_owned()),
        ..AppSettings::default()
    };
    let ports = memory_ports(&settings, store).expect("memory ports");
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(HttpState::new(ports)),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

/// Initialise the full application over `store`.
macro_rules! init_app {
    ($store:expr) => {
        actix_web::test::init_service(tagpet::server::build_app(
            $crate::support::app_dependencies($store),
        ))
        .await
    };
}

/// Send a `TestRequest` and capture the reply.
macro_rules! call {
    ($app:expr, $request:expr) => {{
        let response = actix_web::test::call_service($app, $request.to_request()).await;
        let status = response.status();
        let cookie = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(actix_web::cookie::Cookie::into_owned);
        let bytes = actix_web::test::read_body(response).await;
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        $crate::support::Reply {
            status,
            cookie,
            body,
        }
    }};
}

/// Sign up `email` and return the owner's session cookie.
macro_rules! sign_up {
    ($app:expr, $email:expr, $name:expr) => {{
        let reply = $crate::support::call!(
            $app,
            actix_web::test::TestRequest::post()
                .uri("/api/v1/auth/signup")
                .set_json(serde_json::json!({
                    "email": $email,
                    "password": "correct horse battery",
                    "fullName": $name,
                }))
        );
        assert_eq!(reply.status, actix_web::http::StatusCode::CREATED, "{}", reply.body);
        reply.cookie.expect("session cookie")
    }};
}

pub(crate) use {call, init_app, sign_up};

/// The `status` discriminator of a scan payload.
pub fn scan_status(body: &Value) -> &str {
    body["status"].as_str().expect("scan status")
}
