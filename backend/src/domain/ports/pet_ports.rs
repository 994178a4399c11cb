//! Driving ports for owner pet management.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, Pet, PetDraft, PetId};

/// Domain use-case port for reading an owner's pets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetQuery: Send + Sync {
    /// Pets of `owner`, newest first.
    async fn list(&self, owner: &AccountId) -> Result<Vec<Pet>, Error>;

    /// One owned pet; `not_found` when missing or foreign.
    async fn get(&self, owner: &AccountId, id: &PetId) -> Result<Pet, Error>;
}

/// Domain use-case port for changing an owner's pets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetCommand: Send + Sync {
    /// Create a pet with default privacy settings.
    async fn create(&self, owner: &AccountId, draft: PetDraft) -> Result<Pet, Error>;

    /// Replace the editable fields of an owned pet.
    async fn update(&self, owner: &AccountId, id: &PetId, draft: PetDraft) -> Result<Pet, Error>;

    /// Delete an owned pet, removing its files and releasing its tag.
    async fn delete(&self, owner: &AccountId, id: &PetId) -> Result<(), Error>;
}
