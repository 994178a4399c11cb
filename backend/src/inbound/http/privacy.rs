//! Per-pet privacy settings handlers.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PrivacySettings, PrivacyUpdate, VisibilityFlags};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pets::parse_pet_id;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Privacy settings of one pet.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyResponse {
    /// Pet id.
    pub pet_id: String,
    /// Show the owner's name to finders.
    pub show_name: bool,
    /// Show the owner's email and allow email contact.
    pub show_email: bool,
    /// Show the owner's phone and allow messaging contact.
    pub show_phone: bool,
    /// Show the owner's address.
    pub show_address: bool,
    /// Message always shown to finders.
    pub custom_message: Option<String>,
}

impl From<PrivacySettings> for PrivacyResponse {
    fn from(settings: PrivacySettings) -> Self {
        Self {
            pet_id: settings.pet_id.to_string(),
            show_name: settings.show_name,
            show_email: settings.show_email,
            show_phone: settings.show_phone,
            show_address: settings.show_address,
            custom_message: settings.custom_message,
        }
    }
}

/// Settings form.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyRequest {
    /// Show the owner's name.
    pub show_name: bool,
    /// Show the owner's email.
    pub show_email: bool,
    /// Show the owner's phone.
    pub show_phone: bool,
    /// Show the owner's address.
    pub show_address: bool,
    /// Message for finders; blank clears it.
    #[serde(default)]
    pub custom_message: Option<String>,
}

impl From<PrivacyRequest> for PrivacyUpdate {
    fn from(request: PrivacyRequest) -> Self {
        Self::new(
            VisibilityFlags {
                name: request.show_name,
                email: request.show_email,
                phone: request.show_phone,
                address: request.show_address,
            },
            request.custom_message,
        )
    }
}

/// Fetch a pet's privacy settings, creating defaults when missing.
#[utoipa::path(
    get,
    path = "/api/v1/pets/{id}/privacy",
    params(("id" = String, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Settings", body = PrivacyResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["privacy"],
    operation_id = "getPrivacy"
)]
#[get("/pets/{id}/privacy")]
pub async fn get_privacy(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PrivacyResponse>> {
    let account = session.require_account()?;
    let pet_id = parse_pet_id(&path)?;
    let settings = state.privacy_query.fetch(&account.id, &pet_id).await?;
    Ok(web::Json(settings.into()))
}

/// Replace a pet's privacy settings.
#[utoipa::path(
    put,
    path = "/api/v1/pets/{id}/privacy",
    params(("id" = String, Path, description = "Pet id")),
    request_body = PrivacyRequest,
    responses(
        (status = 200, description = "Updated settings", body = PrivacyResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["privacy"],
    operation_id = "updatePrivacy"
)]
#[put("/pets/{id}/privacy")]
pub async fn update_privacy(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PrivacyRequest>,
) -> ApiResult<web::Json<PrivacyResponse>> {
    let account = session.require_account()?;
    let pet_id = parse_pet_id(&path)?;
    let settings = state
        .privacy_command
        .update(&account.id, &pet_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(settings.into()))
}
