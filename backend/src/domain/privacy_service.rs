//! Privacy settings for owned pets.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    PetRepository, PetRepositoryError, PrivacySettingsCommand, PrivacySettingsQuery,
    PrivacySettingsRepository, PrivacySettingsRepositoryError,
};
use crate::domain::{AccountId, Error, PetId, PrivacySettings, PrivacyUpdate};

/// Privacy settings service implementing the settings driving ports.
#[derive(Clone)]
pub struct PrivacySettingsService<P, S> {
    pets: Arc<P>,
    settings: Arc<S>,
}

impl<P, S> PrivacySettingsService<P, S> {
    /// Create a new service with the given repositories.
    pub fn new(pets: Arc<P>, settings: Arc<S>) -> Self {
        Self { pets, settings }
    }
}

impl<P, S> PrivacySettingsService<P, S>
where
    P: PetRepository,
    S: PrivacySettingsRepository,
{
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

    fn map_settings_error(error: PrivacySettingsRepositoryError) -> Error {
        match error {
            PrivacySettingsRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("privacy repository unavailable: {message}"))
            }
            PrivacySettingsRepositoryError::Query { message } => {
                Error::internal(format!("privacy repository error: {message}"))
            }
        }
    }

    async fn ensure_owned(&self, owner: &AccountId, pet_id: &PetId) -> Result<(), Error> {
        self.pets
            .find_for_owner(owner, pet_id)
            .await
            .map_err(Self::map_pet_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("pet {pet_id} not found")))
    }

    async fn current(&self, pet_id: &PetId) -> Result<Option<PrivacySettings>, Error> {
        self.settings
            .find_by_pet(pet_id)
            .await
            .map_err(Self::map_settings_error)
    }
}

#[async_trait]
impl<P, S> PrivacySettingsQuery for PrivacySettingsService<P, S>
where
    P: PetRepository,
    S: PrivacySettingsRepository,
{
    async fn fetch(&self, owner: &AccountId, pet_id: &PetId) -> Result<PrivacySettings, Error> {
        self.ensure_owned(owner, pet_id).await?;
        if let Some(settings) = self.current(pet_id).await? {
            return Ok(settings);
        }
        let defaults = PrivacySettings::defaults(*pet_id);
        self.settings
            .upsert(&defaults)
            .await
            .map_err(Self::map_settings_error)?;
        Ok(defaults)
    }
}

#[async_trait]
impl<P, S> PrivacySettingsCommand for PrivacySettingsService<P, S>
where
    P: PetRepository,
    S: PrivacySettingsRepository,
{
    async fn update(
        &self,
        owner: &AccountId,
        pet_id: &PetId,
        update: PrivacyUpdate,
    ) -> Result<PrivacySettings, Error> {
        self.ensure_owned(owner, pet_id).await?;
        let settings = self
            .current(pet_id)
            .await?
            .unwrap_or_else(|| PrivacySettings::defaults(*pet_id))
            .apply(update);
        self.settings
            .upsert(&settings)
            .await
            .map_err(Self::map_settings_error)?;
        Ok(settings)
    }
}
