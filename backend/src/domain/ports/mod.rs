//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, identity, storage, email, geocoding, artwork)
//! return typed errors built with [`define_port_error!`]. Driving ports return
//! [`crate::domain::Error`] so inbound adapters can map them uniformly.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod email_sender;
mod identity_provider;
mod object_storage;
mod owner_profile_ports;
mod owner_profile_repository;
mod pet_ports;
mod pet_repository;
mod privacy_settings_ports;
mod privacy_settings_repository;
mod reverse_geocoder;
mod scan;
mod scan_log_repository;
mod tag_artwork_renderer;
mod tag_association;
mod tag_issuance;
mod tag_repository;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
#[cfg(test)]
pub use email_sender::MockEmailSender;
pub use email_sender::{EmailSender, EmailSenderError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use object_storage::MockObjectStorage;
pub use object_storage::{ObjectStorage, ObjectStorageError};
#[cfg(test)]
pub use owner_profile_ports::{MockOwnerProfileCommand, MockOwnerProfileQuery};
pub use owner_profile_ports::{OwnerProfileCommand, OwnerProfileQuery};
#[cfg(test)]
pub use owner_profile_repository::MockOwnerProfileRepository;
pub use owner_profile_repository::{OwnerProfileRepository, OwnerProfileRepositoryError};
#[cfg(test)]
pub use pet_ports::{MockPetCommand, MockPetQuery};
pub use pet_ports::{PetCommand, PetQuery};
#[cfg(test)]
pub use pet_repository::MockPetRepository;
pub use pet_repository::{PetRepository, PetRepositoryError};
#[cfg(test)]
pub use privacy_settings_ports::{MockPrivacySettingsCommand, MockPrivacySettingsQuery};
pub use privacy_settings_ports::{PrivacySettingsCommand, PrivacySettingsQuery};
#[cfg(test)]
pub use privacy_settings_repository::MockPrivacySettingsRepository;
pub use privacy_settings_repository::{
    PrivacySettingsRepository, PrivacySettingsRepositoryError,
};
#[cfg(test)]
pub use reverse_geocoder::MockReverseGeocoder;
pub use reverse_geocoder::{ReverseGeocoder, ReverseGeocoderError};
#[cfg(test)]
pub use scan::{MockFinderContactCommand, MockNotificationDispatch, MockScanQuery};
pub use scan::{ContactSubmission, FinderContactCommand, NotificationDispatch, ScanQuery};
#[cfg(test)]
pub use scan_log_repository::MockScanLogRepository;
pub use scan_log_repository::{ScanLogRepository, ScanLogRepositoryError};
#[cfg(test)]
pub use tag_artwork_renderer::MockTagArtworkRenderer;
pub use tag_artwork_renderer::{
    ArtworkFormat, DEFAULT_ARTWORK_SIZE, MAX_ARTWORK_SIZE, MIN_ARTWORK_SIZE, TagArtwork,
    TagArtworkError, TagArtworkRenderer,
};
#[cfg(test)]
pub use tag_association::{MockTagAssociationCommand, MockTagAssociationQuery};
pub use tag_association::{
    AssociateTagRequest, AssociationOutcome, AssociationView, NextStep, PetSelection,
    TagAssociationCommand, TagAssociationQuery,
};
#[cfg(test)]
pub use tag_issuance::{MockTagArtworkQuery, MockTagIssuanceCommand};
pub use tag_issuance::{
    ArtworkRequest, IssuedTag, MAX_ISSUE_BATCH, TagArtworkQuery, TagIssuanceCommand,
};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{BindTarget, TagBinding, TagRepository, TagRepositoryError};
