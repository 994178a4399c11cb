//! Driving ports for the public scan flow.

use async_trait::async_trait;

use crate::domain::{
    ContactDelivery, Coordinates, Error, FinderContact, FinderLocation, FoundPetNotification,
    ScanResolution, TagCode,
};

/// Finder submission as received by the contact handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    /// Scanned code.
    pub code: TagCode,
    /// Validated contact; its location is the inline one, if sent.
    pub contact: FinderContact,
    /// Whether the finder agreed to share a location.
    pub include_location: bool,
    /// Location captured earlier in the finder's session.
    pub remembered_location: Option<FinderLocation>,
}

/// Domain use-case port for resolving a scanned code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanQuery: Send + Sync {
    /// Resolve a code to a public view. Unknown codes are not an error.
    async fn resolve(&self, code: &TagCode) -> Result<ScanResolution, Error>;
}

/// Domain use-case port for finder actions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinderContactCommand: Send + Sync {
    /// Reverse-geocode best-effort and stamp the location with an expiry.
    async fn capture_location(
        &self,
        code: &TagCode,
        coordinates: Coordinates,
    ) -> Result<FinderLocation, Error>;

    /// Contact the owner and append one scan-log row.
    async fn submit(&self, submission: ContactSubmission) -> Result<ContactDelivery, Error>;
}

/// Domain use-case port for emailing an owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatch: Send + Sync {
    /// Send the notification and return the provider message id.
    async fn dispatch(&self, notification: FoundPetNotification) -> Result<String, Error>;
}
