//! Port abstraction for tag persistence.
//!
//! Binding a tag to a pet touches the tag row, the pet row and possibly a new
//! privacy row. Adapters perform the whole binding atomically so a failure
//! never leaves a tag flagged as associated without a pet pointing at it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AccountId, PetDraft, PetId, Tag, TagCode, TagId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tag repository query failed: {message}",
        /// Another tag already carries this code.
        DuplicateCode { code: String } => "tag code {code} already exists",
        /// The tag was claimed between the guard and the binding.
        AlreadyAssociated { code: String } => "tag {code} is already associated",
        /// The selected pet is missing, foreign, or already tagged.
        PetUnavailable => "pet cannot take this tag",
    }
}

/// Pet receiving a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindTarget {
    /// An existing untagged pet owned by the account.
    Existing(PetId),
    /// A pet created as part of the binding.
    NewPet(PetDraft),
}

/// Everything an adapter needs to bind a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBinding {
    /// Tag being claimed.
    pub tag_id: TagId,
    /// Claiming account.
    pub account: AccountId,
    /// Pet that receives the tag.
    pub target: BindTarget,
    /// Association timestamp, also used as creation time for a new pet.
    pub associated_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Fetch a tag by its printed code.
    async fn find_by_code(&self, code: &TagCode) -> Result<Option<Tag>, TagRepositoryError>;

    /// Store a newly issued tag.
    ///
    /// Returns [`TagRepositoryError::DuplicateCode`] when the code is taken.
    async fn insert(&self, tag: &Tag) -> Result<(), TagRepositoryError>;

    /// Reset a tag flagged as associated that no pet references.
    ///
    /// Returns `false` when the tag was not an orphan by the time the adapter
    /// looked at it.
    async fn release_orphan(&self, tag_id: &TagId) -> Result<bool, TagRepositoryError>;

    /// Bind an unassociated tag to a pet in one atomic step, creating the pet
    /// and its default privacy settings when requested.
    async fn bind(&self, binding: TagBinding) -> Result<PetId, TagRepositoryError>;
}
