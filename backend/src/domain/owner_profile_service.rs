//! Owner profile reads and edits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    OwnerProfileCommand, OwnerProfileQuery, OwnerProfileRepository, OwnerProfileRepositoryError,
};
use crate::domain::{Account, Error, OwnerProfile, ProfileUpdate};

/// Owner profile service implementing the profile driving ports.
#[derive(Clone)]
pub struct OwnerProfileService<R> {
    profiles: Arc<R>,
}

impl<R> OwnerProfileService<R> {
    /// Create a new service with the given repository.
    pub fn new(profiles: Arc<R>) -> Self {
        Self { profiles }
    }
}

impl<R: OwnerProfileRepository> OwnerProfileService<R> {
    fn map_repository_error(error: OwnerProfileRepositoryError) -> Error {
        match error {
            OwnerProfileRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("profile repository unavailable: {message}"))
            }
            OwnerProfileRepositoryError::Query { message } => {
                Error::internal(format!("profile repository error: {message}"))
            }
        }
    }

    async fn load(&self, account: &Account) -> Result<OwnerProfile, Error> {
        let stored = self
            .profiles
            .find(&account.id)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(stored.unwrap_or_else(|| OwnerProfile::blank(account.id, account.email.clone())))
    }
}

#[async_trait]
impl<R: OwnerProfileRepository> OwnerProfileQuery for OwnerProfileService<R> {
    async fn fetch(&self, account: &Account) -> Result<OwnerProfile, Error> {
        self.load(account).await
    }
}

#[async_trait]
impl<R: OwnerProfileRepository> OwnerProfileCommand for OwnerProfileService<R> {
    async fn update(
        &self,
        account: &Account,
        update: ProfileUpdate,
    ) -> Result<OwnerProfile, Error> {
        let profile = self.load(account).await?.apply(update);
        self.profiles
            .upsert(&profile)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(profile)
    }
}
