//! Pet handlers.
//!
//! ```text
//! GET    /api/v1/pets
//! POST   /api/v1/pets {"name":"Luna","breed":"Galgo","age":3}
//! GET    /api/v1/pets/{id}
//! PUT    /api/v1/pets/{id}
//! DELETE /api/v1/pets/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Pet, PetDraft, PetId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, pet_error};

/// Pet as shown to its owner.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    /// Pet id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Breed.
    pub breed: Option<String>,
    /// Age in years.
    pub age: Option<u16>,
    /// Photo URL.
    pub photo_url: Option<String>,
    /// Vaccination record URL.
    pub vaccine_pdf_url: Option<String>,
    /// Code of the tag worn by the pet.
    pub tag_code: Option<String>,
    /// Creation time.
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<Pet> for PetResponse {
    fn from(pet: Pet) -> Self {
        Self {
            id: pet.id.to_string(),
            name: pet.name,
            breed: pet.breed,
            age: pet.age,
            photo_url: pet.photo_url,
            vaccine_pdf_url: pet.vaccine_pdf_url,
            tag_code: pet.tag_code.map(String::from),
            created_at: pet.created_at,
        }
    }
}

/// Pet form shared by create and update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PetRequest {
    /// Name; required.
    pub name: String,
    /// Breed.
    pub breed: Option<String>,
    /// Age in whole years.
    pub age: Option<i64>,
    /// Public URL of an uploaded photo.
    pub photo_url: Option<String>,
    /// Public URL of an uploaded vaccination record.
    pub vaccine_pdf_url: Option<String>,
}

impl PetRequest {
    fn into_draft(self) -> ApiResult<PetDraft> {
        PetDraft::try_new(
            &self.name,
            self.breed,
            self.age,
            self.photo_url,
            self.vaccine_pdf_url,
        )
        .map_err(pet_error)
    }
}

pub(crate) fn parse_pet_id(raw: &str) -> ApiResult<PetId> {
    parse_uuid(raw, FieldName::new("petId")).map(PetId::from_uuid)
}

/// List the owner's pets, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/pets",
    responses(
        (status = 200, description = "Pets", body = [PetResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "listPets"
)]
#[get("/pets")]
pub async fn list_pets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let pets = state.pets_query.list(&account.id).await?;
    let body: Vec<PetResponse> = pets.into_iter().map(PetResponse::from).collect();
    Ok(HttpResponse::Ok().insert_header(private_no_store()).json(body))
}

/// Create a pet with default privacy settings.
#[utoipa::path(
    post,
    path = "/api/v1/pets",
    request_body = PetRequest,
    responses(
        (status = 201, description = "Created", body = PetResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "createPet"
)]
#[post("/pets")]
pub async fn create_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PetRequest>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let draft = payload.into_inner().into_draft()?;
    let pet = state.pets_command.create(&account.id, draft).await?;
    Ok(HttpResponse::Created().json(PetResponse::from(pet)))
}

/// Fetch one owned pet.
#[utoipa::path(
    get,
    path = "/api/v1/pets/{id}",
    params(("id" = String, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Pet", body = PetResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "getPet"
)]
#[get("/pets/{id}")]
pub async fn get_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let id = parse_pet_id(&path)?;
    let pet = state.pets_query.get(&account.id, &id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store())
        .json(PetResponse::from(pet)))
}

/// Replace an owned pet's details.
#[utoipa::path(
    put,
    path = "/api/v1/pets/{id}",
    params(("id" = String, Path, description = "Pet id")),
    request_body = PetRequest,
    responses(
        (status = 200, description = "Updated", body = PetResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "updatePet"
)]
#[put("/pets/{id}")]
pub async fn update_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PetRequest>,
) -> ApiResult<web::Json<PetResponse>> {
    let account = session.require_account()?;
    let id = parse_pet_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    let pet = state.pets_command.update(&account.id, &id, draft).await?;
    Ok(web::Json(pet.into()))
}

/// Delete an owned pet and release its tag.
#[utoipa::path(
    delete,
    path = "/api/v1/pets/{id}",
    params(("id" = String, Path, description = "Pet id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "deletePet"
)]
#[delete("/pets/{id}")]
pub async fn delete_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let id = parse_pet_id(&path)?;
    state.pets_command.delete(&account.id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
