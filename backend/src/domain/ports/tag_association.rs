//! Driving ports for claiming a tag.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{AccountId, Error, Pet, PetId, Tag, TagCode};

/// What the owner sees before choosing a pet for a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationView {
    /// Tag about to be claimed, reset if it was an orphan.
    pub tag: Tag,
    /// Owned pets without a tag, newest first.
    pub candidates: Vec<Pet>,
}

/// Pet chosen to receive the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetSelection {
    /// An existing owned pet.
    Existing(PetId),
    /// Create a placeholder pet.
    CreateNew,
}

/// Association request from the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociateTagRequest {
    /// Claiming account.
    pub account: AccountId,
    /// Tag code.
    pub code: TagCode,
    /// Chosen pet.
    pub selection: PetSelection,
}

/// Where the client should go after associating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    /// A placeholder pet was created and needs details.
    CompletePet,
    /// Nothing left to do.
    Dashboard,
}

/// Result of a successful association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationOutcome {
    /// Pet now holding the tag.
    pub pet_id: PetId,
    /// Suggested next step.
    pub next_step: NextStep,
}

/// Domain use-case port for preparing an association.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagAssociationQuery: Send + Sync {
    /// Guard the tag and list candidate pets.
    async fn prepare(&self, account: &AccountId, code: &TagCode)
    -> Result<AssociationView, Error>;
}

/// Domain use-case port for binding a tag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagAssociationCommand: Send + Sync {
    /// Bind the tag to the selected pet.
    async fn associate(&self, request: AssociateTagRequest) -> Result<AssociationOutcome, Error>;
}
