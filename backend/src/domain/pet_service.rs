//! Pet management for owners.
//!
//! File cleanup is best-effort: storage failures are logged and never block
//! the row change that triggered them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    ObjectStorage, PetCommand, PetQuery, PetRepository, PetRepositoryError,
};
use crate::domain::{AccountId, Error, Pet, PetDraft, PetId, StoredObject};

/// Pet service implementing [`PetQuery`] and [`PetCommand`].
#[derive(Clone)]
pub struct PetService<P, S: ?Sized> {
    pets: Arc<P>,
    storage: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<P, S: ?Sized> PetService<P, S> {
    /// Create a new service with the given collaborators.
    pub fn new(pets: Arc<P>, storage: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            pets,
            storage,
            clock,
        }
    }
}

impl<P, S: ?Sized> PetService<P, S>
where
    P: PetRepository,
    S: ObjectStorage,
{
    fn map_repository_error(error: PetRepositoryError) -> Error {
        match error {
            PetRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("pet repository unavailable: {message}"))
            }
            PetRepositoryError::Query { message } => {
                Error::internal(format!("pet repository error: {message}"))
            }
        }
    }

    fn pet_not_found(id: &PetId) -> Error {
        Error::not_found(format!("pet {id} not found"))
    }

    async fn load_owned(&self, owner: &AccountId, id: &PetId) -> Result<Pet, Error> {
        self.pets
            .find_for_owner(owner, id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::pet_not_found(id))
    }

    async fn remove_objects(&self, pet: &PetId, objects: Vec<StoredObject>) {
        for object in objects {
            if let Err(error) = self.storage.remove(&object).await {
                warn!(
                    pet = %pet,
                    bucket = object.bucket,
                    path = %object.path,
                    %error,
                    "failed to remove stored object"
                );
            }
        }
    }
}

#[async_trait]
impl<P, S: ?Sized> PetQuery for PetService<P, S>
where
    P: PetRepository,
    S: ObjectStorage,
{
    async fn list(&self, owner: &AccountId) -> Result<Vec<Pet>, Error> {
        self.pets
            .list_for_owner(owner)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get(&self, owner: &AccountId, id: &PetId) -> Result<Pet, Error> {
        self.load_owned(owner, id).await
    }
}

#[async_trait]
impl<P, S: ?Sized> PetCommand for PetService<P, S>
where
    P: PetRepository,
    S: ObjectStorage,
{
    async fn create(&self, owner: &AccountId, draft: PetDraft) -> Result<Pet, Error> {
        let pet = Pet::from_draft(*owner, &draft, self.clock.utc());
        self.pets
            .create(&pet)
            .await
            .map_err(Self::map_repository_error)?;
        info!(pet = %pet.id, owner = %owner, "pet created");
        Ok(pet)
    }

    async fn update(&self, owner: &AccountId, id: &PetId, draft: PetDraft) -> Result<Pet, Error> {
        let current = self.load_owned(owner, id).await?;
        let replaced = current.replaced_objects(&draft);
        let updated = current.with_draft(&draft);
        self.pets
            .update(&updated)
            .await
            .map_err(Self::map_repository_error)?;
        self.remove_objects(id, replaced).await;
        Ok(updated)
    }

    async fn delete(&self, owner: &AccountId, id: &PetId) -> Result<(), Error> {
        let pet = self.load_owned(owner, id).await?;
        self.remove_objects(id, pet.stored_objects()).await;
        let deleted = self
            .pets
            .delete_releasing_tag(owner, id)
            .await
            .map_err(Self::map_repository_error)?;
        if !deleted {
            return Err(Self::pet_not_found(id));
        }
        info!(pet = %id, tag = ?pet.tag_id, "pet deleted and tag released");
        Ok(())
    }
}

#[cfg(test)]
#[path = "pet_service_tests.rs"]
mod tests;
