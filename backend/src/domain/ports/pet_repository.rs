//! Port abstraction for pet persistence.

use async_trait::async_trait;

use crate::domain::{AccountId, Pet, PetId, TagId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by pet repository adapters.
    pub enum PetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "pet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "pet repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Pets owned by `owner`, newest first, with their tag codes joined.
    async fn list_for_owner(&self, owner: &AccountId) -> Result<Vec<Pet>, PetRepositoryError>;

    /// Pets owned by `owner` that hold no tag, newest first.
    async fn list_untagged_for_owner(
        &self,
        owner: &AccountId,
    ) -> Result<Vec<Pet>, PetRepositoryError>;

    /// A pet if it exists and belongs to `owner`.
    async fn find_for_owner(
        &self,
        owner: &AccountId,
        id: &PetId,
    ) -> Result<Option<Pet>, PetRepositoryError>;

    /// The pet referencing `tag_id`, if any.
    async fn find_by_tag(&self, tag_id: &TagId) -> Result<Option<Pet>, PetRepositoryError>;

    /// Insert a pet together with default privacy settings.
    async fn create(&self, pet: &Pet) -> Result<(), PetRepositoryError>;

    /// Persist the editable fields of an existing pet.
    async fn update(&self, pet: &Pet) -> Result<(), PetRepositoryError>;

    /// Delete an owned pet and reset its tag to unassociated, atomically.
    ///
    /// Returns `false` when no owned pet matched.
    async fn delete_releasing_tag(
        &self,
        owner: &AccountId,
        id: &PetId,
    ) -> Result<bool, PetRepositoryError>;
}
