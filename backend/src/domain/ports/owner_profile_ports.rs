//! Driving ports for reading and editing the owner profile.

use async_trait::async_trait;

use crate::domain::{Account, Error, OwnerProfile, ProfileUpdate};

/// Domain use-case port for reading the signed-in owner's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerProfileQuery: Send + Sync {
    /// Profile for `account`; a blank profile when none is stored yet.
    async fn fetch(&self, account: &Account) -> Result<OwnerProfile, Error>;
}

/// Domain use-case port for editing the signed-in owner's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerProfileCommand: Send + Sync {
    /// Apply a form update, inserting the profile when missing.
    async fn update(&self, account: &Account, update: ProfileUpdate)
    -> Result<OwnerProfile, Error>;
}
