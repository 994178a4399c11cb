//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports.
//! Types validate on construction; serialisation contracts are documented on
//! each type.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - TagCode, Tag: printed QR tags and their association state.
//! - Pet, PetDraft, StoredObject: owner pets and attached files.
//! - PrivacySettings, VisibilityPolicy: per-pet contact projection.
//! - ScanResolution, FinderContact, ScanLogEntry: public scan flow.
//! - FoundPetNotification: owner email template.

pub mod auth;
pub mod error;
pub mod notification;
pub mod pet;
pub mod ports;
pub mod privacy;
pub mod profile;
pub mod scan;
pub mod tag;
pub mod trace_id;

mod account_service;
mod owner_profile_service;
mod pet_service;
mod privacy_service;
mod scan_service;
mod tag_association_service;
mod tag_issuance_service;
mod text;

#[cfg(test)]
pub(crate) mod test_clock;

pub use self::account_service::AccountService;
pub use self::auth::{
    Account, AccountId, CredentialsValidationError, EmailAddress, LoginCredentials,
    SignupDetails,
};
pub use self::error::{Error, ErrorCode};
pub use self::notification::{FoundPetNotification, OutboundEmail, default_subject};
pub use self::owner_profile_service::OwnerProfileService;
pub use self::pet::{
    PET_PHOTOS_BUCKET, PLACEHOLDER_PET_NAME, Pet, PetDraft, PetId, PetValidationError,
    StoredObject, VACCINE_DOCUMENTS_BUCKET,
};
pub use self::pet_service::PetService;
pub use self::privacy::{
    PrivacySettings, PrivacyUpdate, VisibilityFlags, VisibilityPolicy, VisibleContact,
};
pub use self::privacy_service::PrivacySettingsService;
pub use self::profile::{OwnerProfile, ProfileUpdate};
pub use self::scan::{
    ContactDelivery, ContactMethod, Coordinates, FinderContact, FinderInputError,
    FinderLocation, FoundPet, GeoLocation, ScanLogEntry, ScanResolution,
};
pub use self::scan_service::{FinderCollaborators, NotificationService, ScanService};
pub use self::tag::{Tag, TagCode, TagCodeValidationError, TagId};
pub use self::tag_association_service::TagAssociationService;
pub use self::tag_issuance_service::{TagArtworkService, TagIssuanceService};
pub use self::text::non_blank;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tagpet::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
