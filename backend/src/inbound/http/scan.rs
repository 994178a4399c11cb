//! Public scan handlers used by whoever finds a tagged pet.
//!
//! ```text
//! GET  /api/v1/scan/{code}
//! POST /api/v1/scan/{code}/location {"latitude":40.4168,"longitude":-3.7038}
//! POST /api/v1/scan/{code}/contact  {"method":"email","finderContact":"600 111 222"}
//! ```
//!
//! None of these routes require a session account. The location captured by
//! the second route is kept in the finder's session cookie so the contact
//! submission can attach it without the client echoing it back.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::ContactSubmission;
use crate::domain::{
    ContactDelivery, ContactMethod, Coordinates, FinderContact, FoundPet, GeoLocation,
    ScanResolution, TagCode, VisibleContact,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, finder_error, parse_tag_code};

const CODE_FIELD: FieldName = FieldName::new("code");

fn default_true() -> bool {
    true
}

/// Coordinates with an optional address, as sent by finders.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Address typed by the finder or resolved earlier.
    #[serde(default)]
    pub address: Option<String>,
}

impl LocationPayload {
    pub(crate) fn into_geo(self) -> ApiResult<GeoLocation> {
        let coordinates =
            Coordinates::new(self.latitude, self.longitude).map_err(|err| finder_error(&err))?;
        Ok(GeoLocation::new(coordinates, self.address))
    }
}

/// Pet fields visible to finders.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoundPetResponse {
    /// Pet id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Breed.
    pub breed: Option<String>,
    /// Photo URL.
    pub photo_url: Option<String>,
}

impl From<FoundPet> for FoundPetResponse {
    fn from(pet: FoundPet) -> Self {
        Self {
            id: pet.id.to_string(),
            name: pet.name,
            breed: pet.breed,
            photo_url: pet.photo_url,
        }
    }
}

/// Owner fields the privacy settings allow finders to see.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    /// Owner name.
    pub name: Option<String>,
    /// Owner email.
    pub email: Option<String>,
    /// Owner phone.
    pub phone: Option<String>,
    /// Owner address.
    pub address: Option<String>,
    /// Message from the owner.
    pub custom_message: Option<String>,
}

impl From<VisibleContact> for ContactResponse {
    fn from(contact: VisibleContact) -> Self {
        Self {
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            address: contact.address,
            custom_message: contact.custom_message,
        }
    }
}

/// Result of scanning a code.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanResponse {
    /// No tag carries the code.
    NotFound {
        /// Scanned code as received.
        code: String,
    },
    /// The tag has not been claimed yet.
    Unassociated {
        /// Scanned code.
        code: String,
        /// Page where an owner claims the tag.
        #[serde(rename = "associationPath")]
        association_path: String,
    },
    /// The tag belongs to a pet.
    Associated {
        /// Scanned code.
        code: String,
        /// Pet, when still present.
        pet: Option<FoundPetResponse>,
        /// Visible owner contact.
        contact: ContactResponse,
    },
}

impl From<ScanResolution> for ScanResponse {
    fn from(resolution: ScanResolution) -> Self {
        match resolution {
            ScanResolution::NotFound { code } => Self::NotFound { code: code.into() },
            ScanResolution::Unassociated {
                code,
                association_path,
            } => Self::Unassociated {
                code: code.into(),
                association_path,
            },
            ScanResolution::Associated { code, pet, contact } => Self::Associated {
                code: code.into(),
                pet: pet.map(FoundPetResponse::from),
                contact: contact.into(),
            },
        }
    }
}

/// Location captured for the finder.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapturedLocationResponse {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Reverse-geocoded address.
    pub address: Option<String>,
    /// When the captured location stops being attached to submissions.
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: DateTime<Utc>,
}

/// Finder contact form.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    /// `email` or `whatsapp`.
    #[serde(default)]
    pub method: String,
    /// How the owner can reach the finder.
    #[serde(default)]
    pub finder_contact: String,
    /// Free-text message.
    #[serde(default)]
    pub message: Option<String>,
    /// Share the finder's location with the owner.
    #[serde(default = "default_true")]
    pub include_location: bool,
    /// Location to share; falls back to the one captured earlier.
    #[serde(default)]
    pub location: Option<LocationPayload>,
}

/// How a submission reached the owner.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    /// The owner was emailed.
    Sent,
    /// Email delivery failed; the submission was still recorded.
    Failed,
    /// Open `whatsappUrl` to message the owner.
    Whatsapp,
    /// The owner hides the chosen channel.
    Hidden,
}

/// Outcome of a contact submission.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponseBody {
    /// Delivery outcome.
    pub delivery: DeliveryKind,
    /// Email provider message id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Messaging deep link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<ContactDelivery> for ContactResponseBody {
    fn from(delivery: ContactDelivery) -> Self {
        let blank = |delivery| Self {
            delivery,
            message_id: None,
            whatsapp_url: None,
            reason: None,
        };
        match delivery {
            ContactDelivery::EmailSent { message_id } => Self {
                message_id: Some(message_id),
                ..blank(DeliveryKind::Sent)
            },
            ContactDelivery::EmailFailed { reason } => Self {
                reason: Some(reason),
                ..blank(DeliveryKind::Failed)
            },
            ContactDelivery::WhatsAppLink { url } => Self {
                whatsapp_url: Some(url),
                ..blank(DeliveryKind::Whatsapp)
            },
            ContactDelivery::ChannelHidden => blank(DeliveryKind::Hidden),
        }
    }
}

/// Resolve a scanned code.
///
/// Unknown and malformed codes both answer `not_found` so the page can offer
/// a friendly message instead of an error.
#[utoipa::path(
    get,
    path = "/api/v1/scan/{code}",
    params(("code" = String, Path, description = "Printed tag code")),
    responses((status = 200, description = "Scan result", body = ScanResponse)),
    tags = ["scan"],
    operation_id = "scanTag",
    security([])
)]
#[get("/scan/{code}")]
pub async fn scan_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let body = match TagCode::new(&raw) {
        Ok(code) => ScanResponse::from(state.scan.resolve(&code).await?),
        Err(err) => {
            debug!(code = %raw, error = %err, "malformed scan code");
            ScanResponse::NotFound { code: raw }
        }
    };
    Ok(HttpResponse::Ok().insert_header(private_no_store()).json(body))
}

/// Capture the finder's position and remember it in their session.
#[utoipa::path(
    post,
    path = "/api/v1/scan/{code}/location",
    params(("code" = String, Path, description = "Printed tag code")),
    request_body = LocationPayload,
    responses(
        (status = 200, description = "Captured location", body = CapturedLocationResponse),
        (status = 400, description = "Invalid coordinates", body = ErrorSchema),
        (status = 404, description = "Unknown tag", body = ErrorSchema)
    ),
    tags = ["scan"],
    operation_id = "captureFinderLocation",
    security([])
)]
#[post("/scan/{code}/location")]
pub async fn capture_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<LocationPayload>,
) -> ApiResult<HttpResponse> {
    let code = parse_tag_code(&path, CODE_FIELD)?;
    let LocationPayload {
        latitude,
        longitude,
        ..
    } = payload.into_inner();
    let coordinates = Coordinates::new(latitude, longitude).map_err(|err| finder_error(&err))?;
    let captured = state.finder.capture_location(&code, coordinates).await?;
    session.remember_location(&captured)?;
    let body = CapturedLocationResponse {
        latitude: captured.location.coordinates.latitude(),
        longitude: captured.location.coordinates.longitude(),
        address: captured.location.address,
        expires_at: captured.expires_at,
    };
    Ok(HttpResponse::Ok().insert_header(private_no_store()).json(body))
}

/// Send the finder's message to the owner through the chosen channel.
#[utoipa::path(
    post,
    path = "/api/v1/scan/{code}/contact",
    params(("code" = String, Path, description = "Printed tag code")),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Submission recorded", body = ContactResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown or unclaimed tag", body = ErrorSchema)
    ),
    tags = ["scan"],
    operation_id = "contactOwner",
    security([])
)]
#[post("/scan/{code}/contact")]
pub async fn contact_owner(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<web::Json<ContactResponseBody>> {
    let code = parse_tag_code(&path, CODE_FIELD)?;
    let ContactRequest {
        method,
        finder_contact,
        message,
        include_location,
        location,
    } = payload.into_inner();
    let method: ContactMethod = method.parse().map_err(|err| finder_error(&err))?;
    let location = match location.filter(|_| include_location) {
        Some(payload) => Some(payload.into_geo()?),
        None => None,
    };
    let contact = FinderContact::try_new(method, &finder_contact, message, location)
        .map_err(|err| finder_error(&err))?;
    let delivery = state
        .finder
        .submit(ContactSubmission {
            code,
            contact,
            include_location,
            remembered_location: session.remembered_location(),
        })
        .await?;
    Ok(web::Json(delivery.into()))
}
