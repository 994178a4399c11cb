//! Process-local identity provider for development and tests.
//!
//! Passwords are stored as salted SHA-256 digests; nothing survives a
//! restart.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Account, AccountId, EmailAddress, LoginCredentials, SignupDetails};

struct StoredAccount {
    id: AccountId,
    salt: Uuid,
    digest: String,
}

fn password_digest(salt: &Uuid, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Identity provider keeping accounts in memory.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<EmailAddress, StoredAccount>>,
}

impl InMemoryIdentityProvider {
    /// Create a provider with no accounts.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(&self, details: &SignupDetails) -> Result<Account, IdentityProviderError> {
        let credentials = details.credentials();
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| IdentityProviderError::transport("identity store lock poisoned"))?;
        if accounts.contains_key(credentials.email()) {
            return Err(IdentityProviderError::already_registered(
                credentials.email().as_ref(),
            ));
        }
        let salt = Uuid::new_v4();
        let stored = StoredAccount {
            id: AccountId::random(),
            salt,
            digest: password_digest(&salt, credentials.password()),
        };
        let account = Account {
            id: stored.id,
            email: credentials.email().clone(),
        };
        accounts.insert(credentials.email().clone(), stored);
        Ok(account)
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Account, IdentityProviderError> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| IdentityProviderError::transport("identity store lock poisoned"))?;
        let stored = accounts
            .get(credentials.email())
            .filter(|stored| stored.digest == password_digest(&stored.salt, credentials.password()))
            .ok_or_else(IdentityProviderError::invalid_credentials)?;
        Ok(Account {
            id: stored.id,
            email: credentials.email().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn details() -> SignupDetails {
        SignupDetails::try_from_parts("Ana@Example.com", "s3cret pass", "Ana Owner").expect("details")
    }

    #[rstest]
    #[tokio::test]
    async fn sign_in_accepts_the_signup_password(details: SignupDetails) {
        let provider = InMemoryIdentityProvider::new();
        let created = provider.sign_up(&details).await.expect("signup");

        let credentials =
            LoginCredentials::try_from_parts("ana@example.com", "s3cret pass").expect("creds");
        let account = provider.sign_in(&credentials).await.expect("signin");
        assert_eq!(account, created);
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_passwords_are_invalid_credentials(details: SignupDetails) {
        let provider = InMemoryIdentityProvider::new();
        provider.sign_up(&details).await.expect("signup");

        let credentials =
            LoginCredentials::try_from_parts("ana@example.com", "s3cret").expect("creds");
        let err = provider.sign_in(&credentials).await.expect_err("wrong password");
        assert_eq!(err, IdentityProviderError::InvalidCredentials);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_signups_are_refused(details: SignupDetails) {
        let provider = InMemoryIdentityProvider::new();
        provider.sign_up(&details).await.expect("signup");
        let err = provider.sign_up(&details).await.expect_err("duplicate");
        assert!(matches!(err, IdentityProviderError::AlreadyRegistered { .. }));
    }

    #[rstest]
    fn digests_depend_on_the_salt() {
        let a = password_digest(&Uuid::new_v4(), "pw");
        let b = password_digest(&Uuid::new_v4(), "pw");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
