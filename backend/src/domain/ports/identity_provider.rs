//! Port abstraction for the hosted identity provider.
//!
//! The provider owns passwords; the service only learns the account id and
//! email it hands back.

use async_trait::async_trait;

use crate::domain::{Account, LoginCredentials, SignupDetails};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// Email/password pair was refused.
        InvalidCredentials => "invalid email or password",
        /// An account already exists for the email.
        AlreadyRegistered { email: String } => "an account already exists for {email}",
        /// The provider refused the request for another reason.
        Rejected { message: String } => "identity provider rejected the request: {message}",
        /// Network failure or timeout.
        Transport { message: String } => "identity provider unreachable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account.
    async fn sign_up(&self, details: &SignupDetails) -> Result<Account, IdentityProviderError>;

    /// Verify credentials.
    async fn sign_in(&self, credentials: &LoginCredentials)
    -> Result<Account, IdentityProviderError>;
}
