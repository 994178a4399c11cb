//! Port abstraction for owner profile persistence.

use async_trait::async_trait;

use crate::domain::{AccountId, OwnerProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by owner profile adapters.
    pub enum OwnerProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "owner profile connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "owner profile query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerProfileRepository: Send + Sync {
    /// Profile for an account.
    async fn find(
        &self,
        account: &AccountId,
    ) -> Result<Option<OwnerProfile>, OwnerProfileRepositoryError>;

    /// Insert or replace the profile keyed by account.
    async fn upsert(&self, profile: &OwnerProfile) -> Result<(), OwnerProfileRepositoryError>;
}
