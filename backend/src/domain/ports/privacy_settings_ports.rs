//! Driving ports for per-pet privacy settings.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, PetId, PrivacySettings, PrivacyUpdate};

/// Domain use-case port for reading privacy settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrivacySettingsQuery: Send + Sync {
    /// Settings of an owned pet, creating defaults when none exist.
    async fn fetch(&self, owner: &AccountId, pet_id: &PetId) -> Result<PrivacySettings, Error>;
}

/// Domain use-case port for editing privacy settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrivacySettingsCommand: Send + Sync {
    /// Apply a settings form update to an owned pet.
    async fn update(
        &self,
        owner: &AccountId,
        pet_id: &PetId,
        update: PrivacyUpdate,
    ) -> Result<PrivacySettings, Error>;
}
