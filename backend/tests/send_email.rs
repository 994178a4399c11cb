//! Direct notification endpoint and request tracing over the full app.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};

use support::{call, init_app, seeded_store};

fn notification() -> Value {
    json!({
        "to": "ana@example.com",
        "petName": "Luna",
        "finderContact": "600 111 222",
        "message": "She is at the bakery",
        "location": {"latitude": 40.4168, "longitude": -3.7038}
    })
}

#[rstest]
#[case("petName")]
#[case("to")]
#[case("finderContact")]
#[actix_web::test]
async fn missing_fields_are_rejected(#[case] field: &str) {
    let app = init_app!(seeded_store());
    let mut body = notification();
    body.as_object_mut().expect("object").remove(field);

    let reply = call!(
        &app,
        TestRequest::post().uri("/api/send-email").set_json(body)
    );

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "invalid_request");
    assert_eq!(reply.body["details"]["field"], field);
    assert_eq!(reply.body["details"]["code"], "missing_field");
}

#[actix_web::test]
async fn unconfigured_provider_is_reported() {
    let app = init_app!(seeded_store());

    let reply = call!(
        &app,
        TestRequest::post()
            .uri("/api/send-email")
            .set_json(notification())
    );

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["code"], "internal_error");
    assert_eq!(reply.body["details"]["code"], "email_not_configured");
}

#[actix_web::test]
async fn error_payloads_echo_the_trace_header() {
    let app = init_app!(seeded_store());

    let response = actix_web::test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/send-email")
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    let header = response
        .headers()
        .get(tagpet::domain::TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = actix_web::test::read_body_json(response).await;

    assert_eq!(body["traceId"], header.as_str());
}
