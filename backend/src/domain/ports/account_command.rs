//! Driving port for signup and sign-in.

use async_trait::async_trait;

use crate::domain::{Account, Error, LoginCredentials, SignupDetails};

/// Domain use-case port for account lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register an account and create its owner profile.
    async fn sign_up(&self, details: SignupDetails) -> Result<Account, Error>;

    /// Authenticate an existing account.
    async fn sign_in(&self, credentials: LoginCredentials) -> Result<Account, Error>;
}
