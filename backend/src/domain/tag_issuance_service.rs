//! Tag issuance for the operator and QR artwork for everyone signed in.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ArtworkRequest, IssuedTag, MAX_ISSUE_BATCH, TagArtwork, TagArtworkError, TagArtworkQuery,
    TagArtworkRenderer, TagIssuanceCommand, TagRepository, TagRepositoryError,
};
use crate::domain::{Account, EmailAddress, Error, Tag, TagCode};

const MAX_CODE_ATTEMPTS: usize = 5;

fn map_tag_error(error: TagRepositoryError) -> Error {
    match error {
        TagRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("tag repository unavailable: {message}"))
        }
        other => Error::internal(format!("tag repository error: {other}")),
    }
}

/// Issues tags in batches on behalf of the operator account.
#[derive(Clone)]
pub struct TagIssuanceService<T> {
    tags: Arc<T>,
    clock: Arc<dyn Clock>,
    operator: Option<EmailAddress>,
    base_url: String,
}

impl<T> TagIssuanceService<T> {
    /// Create a new service. Without an operator nobody may issue tags.
    pub fn new(
        tags: Arc<T>,
        clock: Arc<dyn Clock>,
        operator: Option<EmailAddress>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            tags,
            clock,
            operator,
            base_url: base_url.into(),
        }
    }
}

impl<T: TagRepository> TagIssuanceService<T> {
    async fn issue_one(&self) -> Result<Tag, Error> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = TagCode::generate(self.clock.utc(), &mut rand::thread_rng());
            let tag = Tag::unassociated(code);
            match self.tags.insert(&tag).await {
                Ok(()) => return Ok(tag),
                Err(TagRepositoryError::DuplicateCode { code }) => {
                    warn!(%code, attempt, "generated tag code collided; retrying");
                }
                Err(other) => return Err(map_tag_error(other)),
            }
        }
        Err(Error::internal("could not generate a unique tag code"))
    }
}

#[async_trait]
impl<T: TagRepository> TagIssuanceCommand for TagIssuanceService<T> {
    async fn issue(&self, operator: &Account, count: u16) -> Result<Vec<IssuedTag>, Error> {
        if self.operator.as_ref() != Some(&operator.email) {
            return Err(Error::forbidden("only the operator may issue tags"));
        }
        if count == 0 || count > MAX_ISSUE_BATCH {
            return Err(
                Error::invalid_request(format!("count must be between 1 and {MAX_ISSUE_BATCH}"))
                    .with_details(json!({ "field": "count", "code": "out_of_range" })),
            );
        }

        let mut issued = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let tag = self.issue_one().await?;
            let scan_url = tag.code.scan_url(&self.base_url);
            issued.push(IssuedTag { tag, scan_url });
        }
        info!(count, operator = %operator.email, "tags issued");
        Ok(issued)
    }
}

/// Renders QR artwork for existing tags.
#[derive(Clone)]
pub struct TagArtworkService<T, R> {
    tags: Arc<T>,
    renderer: Arc<R>,
    base_url: String,
}

impl<T, R> TagArtworkService<T, R> {
    /// Create a new service encoding scan URLs rooted at `base_url`.
    pub fn new(tags: Arc<T>, renderer: Arc<R>, base_url: impl Into<String>) -> Self {
        Self {
            tags,
            renderer,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl<T, R> TagArtworkQuery for TagArtworkService<T, R>
where
    T: TagRepository,
    R: TagArtworkRenderer,
{
    async fn artwork(&self, code: &TagCode, request: ArtworkRequest) -> Result<TagArtwork, Error> {
        let tag = self
            .tags
            .find_by_code(code)
            .await
            .map_err(map_tag_error)?
            .ok_or_else(|| Error::not_found(format!("tag {code} not found")))?;
        self.renderer
            .render(&tag.code.scan_url(&self.base_url), request.format, request.size)
            .map_err(|error: TagArtworkError| Error::internal(error.to_string()))
    }
}
