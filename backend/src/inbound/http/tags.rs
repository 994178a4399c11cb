//! Tag issuance and QR artwork handlers.
//!
//! ```text
//! POST /api/v1/tags {"count":10}
//! GET  /api/v1/tags/{code}/artwork?format=svg&size=800
//! ```

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    ArtworkFormat, ArtworkRequest, DEFAULT_ARTWORK_SIZE, IssuedTag, MAX_ARTWORK_SIZE,
    MAX_ISSUE_BATCH, MIN_ARTWORK_SIZE,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, out_of_range_error, parse_tag_code,
};

const COUNT_FIELD: FieldName = FieldName::new("count");
const FORMAT_FIELD: FieldName = FieldName::new("format");
const SIZE_FIELD: FieldName = FieldName::new("size");

/// Issue request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct IssueTagsRequest {
    /// Number of tags to mint.
    #[schema(minimum = 1, maximum = 100)]
    pub count: i64,
}

/// A freshly minted tag.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedTagResponse {
    /// Printed code.
    pub code: String,
    /// URL encoded in the QR image.
    pub scan_url: String,
}

impl From<IssuedTag> for IssuedTagResponse {
    fn from(issued: IssuedTag) -> Self {
        Self {
            code: issued.tag.code.into(),
            scan_url: issued.scan_url,
        }
    }
}

/// Issue response.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct IssueTagsResponse {
    /// Minted tags in creation order.
    pub tags: Vec<IssuedTagResponse>,
}

/// Artwork query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArtworkQuery {
    /// `png` (default) or `svg`.
    pub format: Option<String>,
    /// Edge length in pixels.
    pub size: Option<i64>,
}

impl ArtworkQuery {
    fn into_request(self) -> ApiResult<ArtworkRequest> {
        let format = match self.format.as_deref().map(str::trim) {
            None | Some("") => ArtworkFormat::default(),
            Some(raw) => raw
                .parse()
                .map_err(|err: String| invalid_value_error(FORMAT_FIELD, raw, err))?,
        };
        let size = match self.size {
            None => DEFAULT_ARTWORK_SIZE,
            Some(raw) => u32::try_from(raw)
                .ok()
                .filter(|size| (MIN_ARTWORK_SIZE..=MAX_ARTWORK_SIZE).contains(size))
                .ok_or_else(|| {
                    out_of_range_error(
                        SIZE_FIELD,
                        raw,
                        format!("size must be between {MIN_ARTWORK_SIZE} and {MAX_ARTWORK_SIZE}"),
                    )
                })?,
        };
        Ok(ArtworkRequest { format, size })
    }
}

/// Mint a batch of unclaimed tags. Operator only.
#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = IssueTagsRequest,
    responses(
        (status = 201, description = "Tags issued", body = IssueTagsResponse),
        (status = 400, description = "Invalid count", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the operator", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "issueTags"
)]
#[post("/tags")]
pub async fn issue_tags(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<IssueTagsRequest>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let raw = payload.into_inner().count;
    let count = u16::try_from(raw).map_err(|_| {
        out_of_range_error(
            COUNT_FIELD,
            raw,
            format!("count must be between 1 and {MAX_ISSUE_BATCH}"),
        )
    })?;
    let issued = state.tag_issuance.issue(&account, count).await?;
    Ok(HttpResponse::Created().json(IssueTagsResponse {
        tags: issued.into_iter().map(IssuedTagResponse::from).collect(),
    }))
}

/// Render the QR artwork for a tag.
#[utoipa::path(
    get,
    path = "/api/v1/tags/{code}/artwork",
    params(("code" = String, Path, description = "Printed tag code"), ArtworkQuery),
    responses(
        (status = 200, description = "QR image", content(
            ("image/png"),
            ("image/svg+xml")
        )),
        (status = 400, description = "Invalid format or size", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown tag", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "tagArtwork"
)]
#[get("/tags/{code}/artwork")]
pub async fn tag_artwork(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<ArtworkQuery>,
) -> ApiResult<HttpResponse> {
    session.require_account()?;
    let code = parse_tag_code(&path, FieldName::new("code"))?;
    let request = query.into_inner().into_request()?;
    let artwork = state.artwork.artwork(&code, request).await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Inline,
        parameters: vec![DispositionParam::Filename(format!(
            "{code}.{}",
            artwork.format.extension()
        ))],
    };
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store())
        .insert_header((header::CONTENT_TYPE, artwork.format.content_type()))
        .insert_header(disposition)
        .body(artwork.bytes))
}
