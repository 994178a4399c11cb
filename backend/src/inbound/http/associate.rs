//! Tag association handlers.
//!
//! ```text
//! GET  /api/v1/associate?code=QR000TEST
//! POST /api/v1/associate {"code":"QR000TEST","petId":"..."}
//! POST /api/v1/associate {"code":"QR000TEST","createNew":true}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{AssociateTagRequest, AssociationOutcome, NextStep, PetSelection};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store;
use crate::inbound::http::pets::{PetResponse, parse_pet_id};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_tag_code, require_text};

const CODE_FIELD: FieldName = FieldName::new("code");
const PET_ID_FIELD: FieldName = FieldName::new("petId");

/// Query string of the association page.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AssociateQuery {
    /// Scanned tag code.
    pub code: Option<String>,
}

/// Claimable tag plus the pets it can be attached to.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssociationViewResponse {
    /// Tag code.
    pub code: String,
    /// Owner's pets without a tag.
    pub candidates: Vec<PetResponse>,
}

/// Association form.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AssociateRequest {
    /// Tag code.
    pub code: Option<String>,
    /// Existing pet to attach the tag to.
    pub pet_id: Option<String>,
    /// Create a placeholder pet instead.
    pub create_new: bool,
}

impl AssociateRequest {
    fn selection(&self) -> ApiResult<PetSelection> {
        if self.create_new {
            return Ok(PetSelection::CreateNew);
        }
        let raw = require_text(self.pet_id.as_deref(), PET_ID_FIELD)?;
        parse_pet_id(&raw).map(PetSelection::Existing)
    }
}

/// Where the client goes after a successful association.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NextStepDto {
    /// Fill in the placeholder pet's details.
    CompletePet,
    /// Back to the dashboard.
    Dashboard,
}

impl From<NextStep> for NextStepDto {
    fn from(value: NextStep) -> Self {
        match value {
            NextStep::CompletePet => Self::CompletePet,
            NextStep::Dashboard => Self::Dashboard,
        }
    }
}

/// Result of an association.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssociationResponse {
    /// Pet now wearing the tag.
    pub pet_id: String,
    /// Follow-up for the client.
    pub next_step: NextStepDto,
}

impl From<AssociationOutcome> for AssociationResponse {
    fn from(outcome: AssociationOutcome) -> Self {
        Self {
            pet_id: outcome.pet_id.to_string(),
            next_step: outcome.next_step.into(),
        }
    }
}

/// Show a claimable tag and the owner's untagged pets.
#[utoipa::path(
    get,
    path = "/api/v1/associate",
    params(AssociateQuery),
    responses(
        (status = 200, description = "Association view", body = AssociationViewResponse),
        (status = 400, description = "Missing or malformed code", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown tag", body = ErrorSchema),
        (status = 409, description = "Tag already claimed", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "prepareAssociation"
)]
#[get("/associate")]
pub async fn prepare_association(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AssociateQuery>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let raw = require_text(query.code.as_deref(), CODE_FIELD)?;
    let code = parse_tag_code(&raw, CODE_FIELD)?;
    let view = state.association_query.prepare(&account.id, &code).await?;
    let body = AssociationViewResponse {
        code: view.tag.code.into(),
        candidates: view.candidates.into_iter().map(PetResponse::from).collect(),
    };
    Ok(HttpResponse::Ok().insert_header(private_no_store()).json(body))
}

/// Attach a tag to an existing pet or to a new placeholder pet.
#[utoipa::path(
    post,
    path = "/api/v1/associate",
    request_body = AssociateRequest,
    responses(
        (status = 200, description = "Associated", body = AssociationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown tag or pet", body = ErrorSchema),
        (status = 409, description = "Tag or pet already associated", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "associateTag"
)]
#[post("/associate")]
pub async fn associate_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AssociateRequest>,
) -> ApiResult<web::Json<AssociationResponse>> {
    let account = session.require_account()?;
    let request = payload.into_inner();
    let raw = require_text(request.code.as_deref(), CODE_FIELD)?;
    let code = parse_tag_code(&raw, CODE_FIELD)?;
    let selection = request.selection()?;
    let outcome = state
        .association_command
        .associate(AssociateTagRequest {
            account: account.id,
            code,
            selection,
        })
        .await?;
    Ok(web::Json(outcome.into()))
}
