//! Owner profile handlers.

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{OwnerProfile, ProfileUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile as shown to its owner.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Account email.
    pub email: String,
    /// Full name.
    pub full_name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

impl From<OwnerProfile> for ProfileResponse {
    fn from(profile: OwnerProfile) -> Self {
        Self {
            email: profile.email.into(),
            full_name: profile.full_name,
            phone: profile.phone,
            address: profile.address,
        }
    }
}

/// Profile form; blank values clear the field.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRequest {
    /// Full name.
    pub full_name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Fetch the signed-in owner's profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let profile = state.profile_query.fetch(&account).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store())
        .json(ProfileResponse::from(profile)))
}

/// Update the signed-in owner's profile.
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let ProfileRequest {
        full_name,
        phone,
        address,
    } = payload.into_inner();
    let profile = state
        .profile_command
        .update(&account, ProfileUpdate::new(full_name, phone, address))
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store())
        .json(ProfileResponse::from(profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockOwnerProfileCommand, MockOwnerProfileQuery};
    use crate::inbound::http::test_utils::{fixture_account, handler_app, mock_ports, sign_in};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;
    use std::sync::Arc;

    #[actix_web::test]
    async fn profile_requires_login() {
        let app = handler_app!(mock_ports(), get_profile);
        let res = test::call_service(&app, test::TestRequest::get().uri("/profile").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn fetch_returns_blank_profile_fields() {
        let mut query = MockOwnerProfileQuery::new();
        query.expect_fetch().return_once(|account| {
            Ok(OwnerProfile::blank(account.id, account.email.clone()))
        });
        let mut ports = mock_ports();
        ports.profile_query = Arc::new(query);
        let app = handler_app!(ports, get_profile);
        let cookie = sign_in!(&app);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/profile").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: ProfileResponse = test::read_body_json(res).await;
        assert_eq!(body.email, "owner@example.com");
        assert!(body.full_name.is_none() && body.phone.is_none() && body.address.is_none());
    }

    #[actix_web::test]
    async fn update_normalises_blank_values() {
        let mut command = MockOwnerProfileCommand::new();
        command
            .expect_update()
            .withf(|account, update| {
                account.id == fixture_account().id
                    && *update
                        == ProfileUpdate::new(Some("Ana".into()), None, Some("Calle Mayor 1".into()))
            })
            .times(1)
            .return_once(|account, update| {
                Ok(OwnerProfile::blank(account.id, account.email.clone()).apply(update))
            });
        let mut ports = mock_ports();
        ports.profile_command = Arc::new(command);
        let app = handler_app!(ports, update_profile);
        let cookie = sign_in!(&app);

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/profile")
                .cookie(cookie)
                .set_json(json!({"fullName": " Ana ", "phone": "  ", "address": "Calle Mayor 1"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: ProfileResponse = test::read_body_json(res).await;
        assert_eq!(body.full_name.as_deref(), Some("Ana"));
        assert!(body.phone.is_none());
    }
}
