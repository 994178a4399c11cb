//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::HttpResponse;
use actix_web::dev::ServiceResponse;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::ports::{
    MockAccountCommand, MockFinderContactCommand, MockNotificationDispatch,
    MockOwnerProfileCommand, MockOwnerProfileQuery, MockPetCommand, MockPetQuery,
    MockPrivacySettingsCommand, MockPrivacySettingsQuery, MockScanQuery, MockTagArtworkQuery,
    MockTagAssociationCommand, MockTagAssociationQuery, MockTagIssuanceCommand,
};
use crate::domain::{Account, AccountId, EmailAddress, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpStatePorts;

/// Session middleware with a fresh key and a non-secure `session` cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Ports bundle of expectation-free mocks; tests replace the ones they use.
pub fn mock_ports() -> HttpStatePorts {
    HttpStatePorts {
        accounts: Arc::new(MockAccountCommand::new()),
        profile_query: Arc::new(MockOwnerProfileQuery::new()),
        profile_command: Arc::new(MockOwnerProfileCommand::new()),
        pets_query: Arc::new(MockPetQuery::new()),
        pets_command: Arc::new(MockPetCommand::new()),
        privacy_query: Arc::new(MockPrivacySettingsQuery::new()),
        privacy_command: Arc::new(MockPrivacySettingsCommand::new()),
        association_query: Arc::new(MockTagAssociationQuery::new()),
        association_command: Arc::new(MockTagAssociationCommand::new()),
        scan: Arc::new(MockScanQuery::new()),
        finder: Arc::new(MockFinderContactCommand::new()),
        notifications: Arc::new(MockNotificationDispatch::new()),
        tag_issuance: Arc::new(MockTagIssuanceCommand::new()),
        artwork: Arc::new(MockTagArtworkQuery::new()),
    }
}

/// Fixed account used by handler tests.
pub fn fixture_account() -> Account {
    Account {
        id: AccountId::from_uuid(Uuid::from_u128(0x3fa8_5f64_5717_4562_b3fc_2c96_3f66_afa6)),
        email: EmailAddress::new("owner@example.com").expect("fixture email"),
    }
}

/// Signs in [`fixture_account`]; mounted at `/test/sign-in` by [`handler_app!`].
pub async fn sign_in_fixture(session: SessionContext) -> Result<HttpResponse, Error> {
    session.persist_account(&fixture_account())?;
    Ok(HttpResponse::Ok().finish())
}

/// Initialise a test service over `ports` with the given handlers mounted.
macro_rules! handler_app {
    ($ports:expr, $($service:expr),+ $(,)?) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::inbound::http::test_utils::test_session_middleware())
                .app_data(actix_web::web::Data::new(
                    $crate::inbound::http::state::HttpState::new($ports),
                ))
                .route(
                    "/test/sign-in",
                    actix_web::web::post().to($crate::inbound::http::test_utils::sign_in_fixture),
                )
                $(.service($service))+,
        )
        .await
    };
}

/// Session cookie for [`fixture_account`] on an app built by [`handler_app!`].
macro_rules! sign_in {
    ($app:expr) => {{
        let response = actix_web::test::call_service(
            $app,
            actix_web::test::TestRequest::post()
                .uri("/test/sign-in")
                .to_request(),
        )
        .await;
        $crate::inbound::http::test_utils::session_cookie(&response)
    }};
}

pub(crate) use handler_app;
pub(crate) use sign_in;
