//! Claiming a printed tag for a pet.
//!
//! The guard shared by preparation and association rejects tags bound to a
//! live pet and silently resets orphans: tags flagged as associated that no
//! pet references any more.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AssociateTagRequest, AssociationOutcome, AssociationView, BindTarget, NextStep,
    PetRepository, PetRepositoryError, PetSelection, TagAssociationCommand, TagAssociationQuery,
    TagBinding, TagRepository, TagRepositoryError,
};
use crate::domain::{AccountId, Error, PetDraft, PetId, Tag, TagCode};

/// Tag association service implementing the association driving ports.
#[derive(Clone)]
pub struct TagAssociationService<T, P> {
    tags: Arc<T>,
    pets: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<T, P> TagAssociationService<T, P> {
    /// Create a new service with the given collaborators.
    pub fn new(tags: Arc<T>, pets: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { tags, pets, clock }
    }
}

impl<T, P> TagAssociationService<T, P>
where
    T: TagRepository,
    P: PetRepository,
{
    fn map_tag_error(error: TagRepositoryError) -> Error {
        match error {
            TagRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("tag repository unavailable: {message}"))
            }
            TagRepositoryError::Query { message } => {
                Error::internal(format!("tag repository error: {message}"))
            }
            TagRepositoryError::DuplicateCode { code } => {
                Error::internal(format!("unexpected duplicate tag code {code}"))
            }
            TagRepositoryError::AlreadyAssociated { code } => Self::already_associated(&code),
            TagRepositoryError::PetUnavailable => Error::conflict("pet cannot take this tag")
                .with_details(json!({ "field": "petId", "code": "pet_unavailable" })),
        }
    }

    fn map_pet_error(error: PetRepositoryError) -> Error {
        match error {
            PetRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("pet repository unavailable: {message}"))
            }
            PetRepositoryError::Query { message } => {
                Error::internal(format!("pet repository error: {message}"))
            }
        }
    }

    fn already_associated(code: &str) -> Error {
        Error::conflict("tag is already associated with an active pet")
            .with_details(json!({ "code": "tag_already_associated", "tagCode": code }))
    }

    async fn guard(&self, code: &TagCode) -> Result<Tag, Error> {
        let tag = self
            .tags
            .find_by_code(code)
            .await
            .map_err(Self::map_tag_error)?
            .ok_or_else(|| Error::not_found(format!("tag {code} not found")))?;
        if !tag.is_associated {
            return Ok(tag);
        }

        let holder = self
            .pets
            .find_by_tag(&tag.id)
            .await
            .map_err(Self::map_pet_error)?;
        if holder.is_some() {
            return Err(Self::already_associated(code.as_ref()));
        }

        match self.tags.release_orphan(&tag.id).await {
            Ok(released) => info!(tag = %tag.code, released, "orphaned tag reset"),
            Err(error) => warn!(tag = %tag.code, %error, "failed to reset orphaned tag"),
        }
        Ok(Tag {
            is_associated: false,
            owner: None,
            associated_at: None,
            ..tag
        })
    }

    async fn check_selected_pet(&self, account: &AccountId, pet_id: &PetId) -> Result<(), Error> {
        let pet = self
            .pets
            .find_for_owner(account, pet_id)
            .await
            .map_err(Self::map_pet_error)?
            .ok_or_else(|| Error::not_found(format!("pet {pet_id} not found")))?;
        if pet.tag_id.is_some() {
            return Err(Error::conflict("pet already has a tag")
                .with_details(json!({ "field": "petId", "code": "pet_already_tagged" })));
        }
        Ok(())
    }
}

#[async_trait]
impl<T, P> TagAssociationQuery for TagAssociationService<T, P>
where
    T: TagRepository,
    P: PetRepository,
{
    async fn prepare(
        &self,
        account: &AccountId,
        code: &TagCode,
    ) -> Result<AssociationView, Error> {
        let tag = self.guard(code).await?;
        let candidates = self
            .pets
            .list_untagged_for_owner(account)
            .await
            .map_err(Self::map_pet_error)?;
        Ok(AssociationView { tag, candidates })
    }
}

#[async_trait]
impl<T, P> TagAssociationCommand for TagAssociationService<T, P>
where
    T: TagRepository,
    P: PetRepository,
{
    async fn associate(&self, request: AssociateTagRequest) -> Result<AssociationOutcome, Error> {
        let AssociateTagRequest {
            account,
            code,
            selection,
        } = request;
        let tag = self.guard(&code).await?;

        let (target, next_step) = match selection {
            PetSelection::Existing(pet_id) => {
                self.check_selected_pet(&account, &pet_id).await?;
                (BindTarget::Existing(pet_id), NextStep::Dashboard)
            }
            PetSelection::CreateNew => (
                BindTarget::NewPet(PetDraft::placeholder()),
                NextStep::CompletePet,
            ),
        };

        let pet_id = self
            .tags
            .bind(TagBinding {
                tag_id: tag.id,
                account,
                target,
                associated_at: self.clock.utc(),
            })
            .await
            .map_err(Self::map_tag_error)?;
        info!(tag = %code, pet = %pet_id, account = %account, "tag associated");
        Ok(AssociationOutcome { pet_id, next_step })
    }
}

#[cfg(test)]
#[path = "tag_association_service_tests.rs"]
mod tests;
