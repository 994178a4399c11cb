//! Owner journey: associate a tag, delete the pet, claim the tag again.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::json;

use support::{call, init_app, scan_status, seeded_store, sign_up};

#[actix_web::test]
async fn deleting_a_tagged_pet_frees_the_tag() {
    let app = init_app!(seeded_store());
    let owner = sign_up!(&app, "ana@example.com", "Ana García");

    let view = call!(
        &app,
        TestRequest::get()
            .uri("/api/v1/associate?code=QR000TEST")
            .cookie(owner.clone())
    );
    assert_eq!(view.status, StatusCode::OK, "{}", view.body);
    assert_eq!(view.body["code"], "QR000TEST");
    assert_eq!(view.body["candidates"], json!([]));

    let first = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/associate")
            .cookie(owner.clone())
            .set_json(json!({"code": "QR000TEST", "createNew": true}))
    );
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    assert_eq!(first.body["nextStep"], "complete_pet");
    let pet_id = first.body["petId"].as_str().expect("pet id").to_owned();

    let pets = call!(
        &app,
        TestRequest::get().uri("/api/v1/pets").cookie(owner.clone())
    );
    assert_eq!(pets.body[0]["id"], pet_id.as_str());
    assert_eq!(pets.body[0]["tagCode"], "QR000TEST");

    let deleted = call!(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/v1/pets/{pet_id}"))
            .cookie(owner.clone())
    );
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let scan = call!(&app, TestRequest::get().uri("/api/v1/scan/QR000TEST"));
    assert_eq!(scan_status(&scan.body), "unassociated");

    let replacement = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/pets")
            .cookie(owner.clone())
            .set_json(json!({"name": "Coco", "age": 2}))
    );
    let replacement_id = replacement.body["id"].as_str().expect("pet id").to_owned();

    let again = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/associate")
            .cookie(owner)
            .set_json(json!({"code": "QR000TEST", "petId": replacement_id}))
    );
    assert_eq!(again.status, StatusCode::OK, "{}", again.body);
    assert_eq!(again.body["petId"], replacement_id.as_str());

    let rescan = call!(&app, TestRequest::get().uri("/api/v1/scan/QR000TEST"));
    assert_eq!(scan_status(&rescan.body), "associated");
    assert_eq!(rescan.body["pet"]["name"], "Coco");
}

#[actix_web::test]
async fn a_claimed_tag_cannot_be_taken_by_another_owner() {
    let app = init_app!(seeded_store());
    let ana = sign_up!(&app, "ana@example.com", "Ana García");
    let luis = sign_up!(&app, "luis@example.com", "Luis Pérez");

    let claimed = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/associate")
            .cookie(ana)
            .set_json(json!({"code": "QR000TEST", "createNew": true}))
    );
    assert_eq!(claimed.status, StatusCode::OK);

    let view = call!(
        &app,
        TestRequest::get()
            .uri("/api/v1/associate?code=QR000TEST")
            .cookie(luis.clone())
    );
    assert_eq!(view.status, StatusCode::CONFLICT);

    let stolen = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/associate")
            .cookie(luis)
            .set_json(json!({"code": "QR000TEST", "createNew": true}))
    );
    assert_eq!(stolen.status, StatusCode::CONFLICT);
    assert_eq!(stolen.body["code"], "conflict");
}

#[actix_web::test]
async fn owner_routes_require_a_session() {
    let app = init_app!(seeded_store());

    let reply = call!(&app, TestRequest::get().uri("/api/v1/pets"));

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["code"], "unauthorized");
}

#[actix_web::test]
async fn signing_in_again_restores_access() {
    let app = init_app!(seeded_store());
    let first = sign_up!(&app, "ana@example.com", "Ana García");

    let logout = call!(
        &app,
        TestRequest::post().uri("/api/v1/auth/logout").cookie(first)
    );
    assert_eq!(logout.status, StatusCode::NO_CONTENT);

    let wrong = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "ana@example.com", "password": "nope"}))
    );
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let login = call!(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "ana@example.com", "password": "correct horse battery"}))
    );
    assert_eq!(login.status, StatusCode::OK, "{}", login.body);
    let cookie = login.cookie.expect("session cookie");

    let profile = call!(
        &app,
        TestRequest::get().uri("/api/v1/profile").cookie(cookie)
    );
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["email"], "ana@example.com");
    assert_eq!(profile.body["fullName"], "Ana García");
}
