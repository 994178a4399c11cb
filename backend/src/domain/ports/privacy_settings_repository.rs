//! Port abstraction for per-pet privacy settings.

use async_trait::async_trait;

use crate::domain::{PetId, PrivacySettings};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by privacy settings adapters.
    pub enum PrivacySettingsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "privacy settings connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "privacy settings query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrivacySettingsRepository: Send + Sync {
    /// Settings for a pet.
    async fn find_by_pet(
        &self,
        pet_id: &PetId,
    ) -> Result<Option<PrivacySettings>, PrivacySettingsRepositoryError>;

    /// Insert or replace the settings row keyed by pet.
    async fn upsert(&self, settings: &PrivacySettings)
    -> Result<(), PrivacySettingsRepositoryError>;
}
