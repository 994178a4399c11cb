//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, FinderContactCommand, NotificationDispatch, OwnerProfileCommand,
    OwnerProfileQuery, PetCommand, PetQuery, PrivacySettingsCommand, PrivacySettingsQuery,
    ScanQuery, TagArtworkQuery, TagAssociationCommand, TagAssociationQuery, TagIssuanceCommand,
};

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Signup and sign-in.
    pub accounts: Arc<dyn AccountCommand>,
    /// Owner profile reads.
    pub profile_query: Arc<dyn OwnerProfileQuery>,
    /// Owner profile edits.
    pub profile_command: Arc<dyn OwnerProfileCommand>,
    /// Pet reads.
    pub pets_query: Arc<dyn PetQuery>,
    /// Pet changes.
    pub pets_command: Arc<dyn PetCommand>,
    /// Privacy settings reads.
    pub privacy_query: Arc<dyn PrivacySettingsQuery>,
    /// Privacy settings edits.
    pub privacy_command: Arc<dyn PrivacySettingsCommand>,
    /// Association view.
    pub association_query: Arc<dyn TagAssociationQuery>,
    /// Tag binding.
    pub association_command: Arc<dyn TagAssociationCommand>,
    /// Public scan lookup.
    pub scan: Arc<dyn ScanQuery>,
    /// Finder location capture and contact.
    pub finder: Arc<dyn FinderContactCommand>,
    /// Direct owner notification endpoint.
    pub notifications: Arc<dyn NotificationDispatch>,
    /// Operator tag issuance.
    pub tag_issuance: Arc<dyn TagIssuanceCommand>,
    /// QR artwork.
    pub artwork: Arc<dyn TagArtworkQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Accounts.
    pub accounts: Arc<dyn AccountCommand>,
    /// Profile reads.
    pub profile_query: Arc<dyn OwnerProfileQuery>,
    /// Profile edits.
    pub profile_command: Arc<dyn OwnerProfileCommand>,
    /// Pet reads.
    pub pets_query: Arc<dyn PetQuery>,
    /// Pet changes.
    pub pets_command: Arc<dyn PetCommand>,
    /// Privacy reads.
    pub privacy_query: Arc<dyn PrivacySettingsQuery>,
    /// Privacy edits.
    pub privacy_command: Arc<dyn PrivacySettingsCommand>,
    /// Association view.
    pub association_query: Arc<dyn TagAssociationQuery>,
    /// Tag binding.
    pub association_command: Arc<dyn TagAssociationCommand>,
    /// Scan lookup.
    pub scan: Arc<dyn ScanQuery>,
    /// Finder actions.
    pub finder: Arc<dyn FinderContactCommand>,
    /// Owner notifications.
    pub notifications: Arc<dyn NotificationDispatch>,
    /// Tag issuance.
    pub tag_issuance: Arc<dyn TagIssuanceCommand>,
    /// QR artwork.
    pub artwork: Arc<dyn TagArtworkQuery>,
}

impl HttpState {
    /// Build state from a ports bundle.
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            profile_query,
            profile_command,
            pets_query,
            pets_command,
            privacy_query,
            privacy_command,
            association_query,
            association_command,
            scan,
            finder,
            notifications,
            tag_issuance,
            artwork,
        } = ports;
        Self {
            accounts,
            profile_query,
            profile_command,
            pets_query,
            pets_command,
            privacy_query,
            privacy_command,
            association_query,
            association_command,
            scan,
            finder,
            notifications,
            tag_issuance,
            artwork,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
