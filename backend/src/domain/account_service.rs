//! Account signup and sign-in.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    AccountCommand, IdentityProvider, IdentityProviderError, OwnerProfileRepository,
    OwnerProfileRepositoryError,
};
use crate::domain::{Account, Error, LoginCredentials, OwnerProfile, ProfileUpdate, SignupDetails};

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<I: ?Sized, O> {
    identity: Arc<I>,
    profiles: Arc<O>,
}

impl<I: ?Sized, O> AccountService<I, O> {
    /// Create a new service with the given collaborators.
    pub fn new(identity: Arc<I>, profiles: Arc<O>) -> Self {
        Self { identity, profiles }
    }
}

impl<I: ?Sized, O> AccountService<I, O>
where
    I: IdentityProvider,
    O: OwnerProfileRepository,
{
    fn map_identity_error(error: IdentityProviderError) -> Error {
        match error {
            IdentityProviderError::InvalidCredentials => {
                Error::unauthorized("invalid email or password")
            }
            IdentityProviderError::AlreadyRegistered { email } => {
                Error::conflict("an account already exists for this email")
                    .with_details(json!({ "field": "email", "value": email }))
            }
            IdentityProviderError::Rejected { message } => Error::invalid_request(message),
            IdentityProviderError::Transport { message } => {
                Error::service_unavailable(format!("identity provider unavailable: {message}"))
            }
        }
    }

    fn map_profile_error(error: OwnerProfileRepositoryError) -> Error {
        match error {
            OwnerProfileRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("profile repository unavailable: {message}"))
            }
            OwnerProfileRepositoryError::Query { message } => {
                Error::internal(format!("profile repository error: {message}"))
            }
        }
    }
}

#[async_trait]
impl<I: ?Sized, O> AccountCommand for AccountService<I, O>
where
    I: IdentityProvider,
    O: OwnerProfileRepository,
{
    async fn sign_up(&self, details: SignupDetails) -> Result<Account, Error> {
        let account = self
            .identity
            .sign_up(&details)
            .await
            .map_err(Self::map_identity_error)?;

        let profile = OwnerProfile::blank(account.id, account.email.clone()).apply(
            ProfileUpdate::new(Some(details.full_name().to_owned()), None, None),
        );
        if let Err(error) = self.profiles.upsert(&profile).await {
            warn!(account = %account.id, %error, "account created without owner profile");
            return Err(Self::map_profile_error(error));
        }
        Ok(account)
    }

    async fn sign_in(&self, credentials: LoginCredentials) -> Result<Account, Error> {
        self.identity
            .sign_in(&credentials)
            .await
            .map_err(Self::map_identity_error)
    }
}
