//! GoTrue-backed identity provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SupabaseProject;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Account, AccountId, EmailAddress, LoginCredentials, SignupDetails};
use crate::outbound::http_support::status_message;

#[derive(Serialize)]
struct SignupDto<'a> {
    email: &'a str,
    password: &'a str,
    data: SignupMetadataDto<'a>,
}

#[derive(Serialize)]
struct SignupMetadataDto<'a> {
    full_name: &'a str,
}

#[derive(Serialize)]
struct PasswordGrantDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: Uuid,
    email: Option<String>,
}

/// GoTrue answers with either a session wrapping `user` or the bare user.
#[derive(Debug, Deserialize)]
struct AuthResponseDto {
    user: Option<UserDto>,
    id: Option<Uuid>,
    email: Option<String>,
}

impl AuthResponseDto {
    fn into_account(self, fallback_email: &EmailAddress) -> Result<Account, IdentityProviderError> {
        let (id, email) = match self.user {
            Some(user) => (user.id, user.email),
            None => (
                self.id
                    .ok_or_else(|| IdentityProviderError::rejected("response carried no user"))?,
                self.email,
            ),
        };
        let email = match email {
            Some(raw) => EmailAddress::new(&raw).map_err(|err| {
                IdentityProviderError::rejected(format!("provider returned invalid email: {err}"))
            })?,
            None => fallback_email.clone(),
        };
        Ok(Account {
            id: AccountId::from_uuid(id),
            email,
        })
    }
}

/// Identity provider speaking the Supabase GoTrue REST API.
pub struct SupabaseIdentityProvider {
    client: Client,
    project: SupabaseProject,
}

impl SupabaseIdentityProvider {
    /// Build a provider with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(project: SupabaseProject, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, project })
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<(StatusCode, Vec<u8>), IdentityProviderError> {
        let url = self
            .project
            .endpoint(path)
            .map_err(|err| IdentityProviderError::transport(err.to_string()))?;
        let response = self
            .client
            .post(url)
            .header("apikey", self.project.api_key())
            .json(payload)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn sign_up(&self, details: &SignupDetails) -> Result<Account, IdentityProviderError> {
        let credentials = details.credentials();
        let payload = SignupDto {
            email: credentials.email().as_ref(),
            password: credentials.password(),
            data: SignupMetadataDto {
                full_name: details.full_name(),
            },
        };
        let (status, body) = self.post("auth/v1/signup", &payload).await?;
        if !status.is_success() {
            return Err(map_signup_error(status, &body, credentials.email()));
        }
        parse_account(&body, credentials.email())
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Account, IdentityProviderError> {
        let payload = PasswordGrantDto {
            email: credentials.email().as_ref(),
            password: credentials.password(),
        };
        let (status, body) = self
            .post("auth/v1/token?grant_type=password", &payload)
            .await?;
        if !status.is_success() {
            return Err(map_signin_error(status, &body));
        }
        parse_account(&body, credentials.email())
    }
}

fn parse_account(body: &[u8], email: &EmailAddress) -> Result<Account, IdentityProviderError> {
    serde_json::from_slice::<AuthResponseDto>(body)
        .map_err(|error| {
            IdentityProviderError::transport(format!("invalid identity response: {error}"))
        })?
        .into_account(email)
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::transport(error.to_string())
}

fn map_signup_error(status: StatusCode, body: &[u8], email: &EmailAddress) -> IdentityProviderError {
    let message = status_message(status, body);
    let lowered = message.to_lowercase();
    if lowered.contains("already registered") || lowered.contains("user_already_exists") {
        return IdentityProviderError::already_registered(email.as_ref());
    }
    if status.is_client_error() {
        IdentityProviderError::rejected(message)
    } else {
        IdentityProviderError::transport(message)
    }
}

fn map_signin_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
            IdentityProviderError::invalid_credentials()
        }
        _ if status.is_client_error() => {
            IdentityProviderError::rejected(status_message(status, body))
        }
        _ => IdentityProviderError::transport(status_message(status, body)),
    }
}
