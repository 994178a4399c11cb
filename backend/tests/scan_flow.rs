//! Public scan flow over the in-memory application.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

use support::{call, init_app, scan_status, seeded_store, sign_up};

#[actix_web::test]
async fn demo_tag_offers_association() {
    let app = init_app!(seeded_store());

    let reply = call!(&app, TestRequest::get().uri("/api/v1/scan/QR000TEST"));

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(scan_status(&reply.body), "unassociated");
    assert_eq!(reply.body["associationPath"], "/associate-qr?code=QR000TEST");
    assert!(reply.body.get("contact").is_none());
    assert!(reply.body.get("pet").is_none());
}

#[rstest]
#[case("QR404NOPE")]
#[case("not a code")]
#[actix_web::test]
async fn unknown_codes_resolve_to_not_found(#[case] code: &str) {
    let app = init_app!(seeded_store());
    let uri = format!("/api/v1/scan/{}", code.replace(' ', "%20"));

    let reply = call!(&app, TestRequest::get().uri(&uri));

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(scan_status(&reply.body), "not_found");
}

#[actix_web::test]
async fn privacy_settings_shape_the_finder_view() {
    let app = init_app!(seeded_store());
    let owner = sign_up!(&app, "ana@example.com", "Ana García");

    let profile = call!(
        &app,
        TestRequest::put()
            .uri("/api/v1/profile")
            .cookie(owner.clone())
            .set_json(json!({
                "fullName": "Ana García",
                "phone": "+34 600 111 222",
                "address": "Calle Mayor 1, Madrid"
            }))
    );
    assert_eq!(profile.status, StatusCode::OK, "{}", profile.body);

    let pet = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/pets")
            .cookie(owner.clone())
            .set_json(json!({"name": "Luna", "breed": "Galgo"}))
    );
    assert_eq!(pet.status, StatusCode::CREATED, "{}", pet.body);
    let pet_id = pet.body["id"].as_str().expect("pet id").to_owned();

    let associated = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/associate")
            .cookie(owner.clone())
            .set_json(json!({"code": "QR000TEST", "petId": pet_id}))
    );
    assert_eq!(associated.status, StatusCode::OK, "{}", associated.body);
    assert_eq!(associated.body["nextStep"], "dashboard");

    let privacy = call!(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/pets/{pet_id}/privacy"))
            .cookie(owner)
            .set_json(json!({
                "showName": true,
                "showEmail": false,
                "showPhone": false,
                "showAddress": true,
                "customMessage": "She is shy, please call softly"
            }))
    );
    assert_eq!(privacy.status, StatusCode::OK, "{}", privacy.body);

    let scan = call!(&app, TestRequest::get().uri("/api/v1/scan/QR000TEST"));
    assert_eq!(scan_status(&scan.body), "associated");
    assert_eq!(scan.body["pet"]["name"], "Luna");
    let contact = &scan.body["contact"];
    assert_eq!(contact["name"], "Ana García");
    assert_eq!(contact["address"], "Calle Mayor 1, Madrid");
    assert_eq!(contact["customMessage"], "She is shy, please call softly");
    assert!(contact["phone"].is_null());
    assert!(contact["email"].is_null());
}

#[actix_web::test]
async fn every_finder_submission_is_logged_once() {
    let store = seeded_store();
    let app = init_app!(store.clone());
    let owner = sign_up!(&app, "ana@example.com", "Ana García");
    call!(
        &app,
        TestRequest::put()
            .uri("/api/v1/profile")
            .cookie(owner.clone())
            .set_json(json!({"phone": "+34 600 111 222"}))
    );
    let associated = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/associate")
            .cookie(owner)
            .set_json(json!({"code": "QR000TEST", "createNew": true}))
    );
    assert_eq!(associated.status, StatusCode::OK, "{}", associated.body);

    let captured = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/scan/QR000TEST/location")
            .set_json(json!({"latitude": 40.4168, "longitude": -3.7038}))
    );
    assert_eq!(captured.status, StatusCode::OK, "{}", captured.body);
    let finder = captured.cookie.expect("finder session cookie");

    let declined = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/scan/QR000TEST/contact")
            .cookie(finder.clone())
            .set_json(json!({
                "method": "whatsapp",
                "finderContact": "maria@example.com",
                "includeLocation": false
            }))
    );
    assert_eq!(declined.status, StatusCode::OK, "{}", declined.body);
    assert_eq!(declined.body["delivery"], "whatsapp");

    let shared = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/scan/QR000TEST/contact")
            .cookie(finder)
            .set_json(json!({
                "method": "email",
                "finderContact": "maria@example.com",
                "message": "Found near the park"
            }))
    );
    assert_eq!(shared.status, StatusCode::OK, "{}", shared.body);
    // No email provider is configured in memory mode.
    assert_eq!(shared.body["delivery"], "failed");

    let logs = store.scan_logs();
    assert_eq!(logs.len(), 2);
    let first = logs.first().expect("first entry");
    assert!(first.location.is_none());
    assert!(first.message_sent);
    let second = logs.get(1).expect("second entry");
    let location = second.location.as_ref().expect("remembered location");
    assert!((location.coordinates.latitude() - 40.4168).abs() < 1e-9);
    assert!(!second.message_sent);
    assert_eq!(second.message.as_deref(), Some("Found near the park"));
}

#[actix_web::test]
async fn contacting_an_unclaimed_tag_is_not_found() {
    let store = seeded_store();
    let app = init_app!(store.clone());

    let reply = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/scan/QR000TEST/contact")
            .set_json(json!({"method": "email", "finderContact": "maria@example.com"}))
    );

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "not_found");
    assert!(store.scan_logs().is_empty());
}
