//! Builders wiring driven adapters into the services behind [`HttpState`].
//!
//! Repositories come either from PostgreSQL or from one shared
//! [`InMemoryStore`]. External collaborators (identity, storage, email,
//! geocoding) fall back to in-process stand-ins when their settings are
//! absent, so a bare `cargo run` serves a working demo.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};
use url::Url;

use crate::domain::ports::{
    IdentityProvider, ObjectStorage, OwnerProfileRepository, PetRepository,
    PrivacySettingsRepository, ReverseGeocoder, ScanLogRepository, TagRepository,
};
use crate::domain::{
    AccountService, EmailAddress, FinderCollaborators, NotificationService,
    OwnerProfileService, PetService, PrivacySettingsService, ScanService, TagArtworkService,
    TagAssociationService, TagCode, TagIssuanceService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::email::{EMAIL_TIMEOUT, RESEND_EMAILS_ENDPOINT, ResendEmailSender};
use crate::outbound::geocoding::{
    DisabledGeocoder, GEOCODING_TIMEOUT, OPENCAGE_ENDPOINT, OpenCageGeocoder,
};
use crate::outbound::memory::{InMemoryIdentityProvider, InMemoryStore};
use crate::outbound::persistence::{
    DbPool, DieselOwnerProfileRepository, DieselPetRepository, DieselPrivacySettingsRepository,
    DieselScanLogRepository, DieselTagRepository,
};
use crate::outbound::qr::QrArtworkRenderer;
use crate::outbound::supabase::{
    DisabledObjectStorage, SUPABASE_TIMEOUT, SupabaseIdentityProvider, SupabaseObjectStorage,
    SupabaseProject,
};

use super::config::AppSettings;

/// Tag provisioned in memory mode so the scan flow can be tried immediately.
pub const DEMO_TAG_CODE: &str = "QR000TEST";

/// Repository set shared by every service.
struct Repositories<T, P, S, O> {
    tags: Arc<T>,
    pets: Arc<P>,
    privacy: Arc<S>,
    profiles: Arc<O>,
    scan_log: Arc<dyn ScanLogRepository>,
}

/// Collaborators outside the database.
struct Collaborators {
    identity: Arc<dyn IdentityProvider>,
    storage: Arc<dyn ObjectStorage>,
    geocoder: Arc<dyn ReverseGeocoder>,
    email: Arc<ResendEmailSender>,
    clock: Arc<dyn Clock>,
}

fn other_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

fn supabase_project(settings: &AppSettings) -> io::Result<Option<SupabaseProject>> {
    let url = AppSettings::present(settings.supabase_url.as_ref());
    let key = AppSettings::present(settings.supabase_key.as_ref());
    match (url, key) {
        (Some(url), Some(key)) => {
            let base = Url::parse(url).map_err(|e| other_error("invalid Supabase URL", e))?;
            Ok(Some(SupabaseProject::new(base, key)))
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("Supabase needs both URL and key; using in-process identity and no storage");
            Ok(None)
        }
        (None, None) => Ok(None),
    }
}

fn build_collaborators(settings: &AppSettings) -> io::Result<Collaborators> {
    let (identity, storage): (Arc<dyn IdentityProvider>, Arc<dyn ObjectStorage>) =
        match supabase_project(settings)? {
            Some(project) => (
                Arc::new(
                    SupabaseIdentityProvider::new(project.clone(), SUPABASE_TIMEOUT)
                        .map_err(|e| other_error("identity client", e))?,
                ),
                Arc::new(
                    SupabaseObjectStorage::new(project, SUPABASE_TIMEOUT)
                        .map_err(|e| other_error("storage client", e))?,
                ),
            ),
            None => {
                warn!("identity provider not configured; accounts are kept in memory");
                (
                    Arc::new(InMemoryIdentityProvider::new()),
                    Arc::new(DisabledObjectStorage),
                )
            }
        };

    let geocoder: Arc<dyn ReverseGeocoder> =
        match AppSettings::present(settings.opencage_key.as_ref()) {
            Some(key) => {
                let endpoint = Url::parse(OPENCAGE_ENDPOINT)
                    .map_err(|e| other_error("geocoding endpoint", e))?;
                Arc::new(
                    OpenCageGeocoder::new(endpoint, key.to_owned(), GEOCODING_TIMEOUT)
                        .map_err(|e| other_error("geocoding client", e))?,
                )
            }
            None => {
                info!("reverse geocoding disabled; captured locations carry no address");
                Arc::new(DisabledGeocoder)
            }
        };

    let endpoint =
        Url::parse(RESEND_EMAILS_ENDPOINT).map_err(|e| other_error("email endpoint", e))?;
    let email = ResendEmailSender::new(
        endpoint,
        settings.resend_api_key.clone(),
        settings.resend_from.clone(),
        EMAIL_TIMEOUT,
    )
    .map_err(|e| other_error("email client", e))?;
    if !email.is_configured() {
        warn!("email API key missing; owner notifications will fail with email_not_configured");
    }

    Ok(Collaborators {
        identity,
        storage,
        geocoder,
        email: Arc::new(email),
        clock: Arc::new(DefaultClock),
    })
}

fn operator_email(settings: &AppSettings) -> Option<EmailAddress> {
    let raw = AppSettings::present(settings.operator_email.as_ref())?;
    match EmailAddress::new(raw) {
        Ok(email) => Some(email),
        Err(error) => {
            warn!(%error, "ignoring malformed operator email; tag issuance disabled");
            None
        }
    }
}

fn wire_ports<T, P, S, O>(
    repos: Repositories<T, P, S, O>,
    collaborators: Collaborators,
    settings: &AppSettings,
) -> HttpStatePorts
where
    T: TagRepository + 'static,
    P: PetRepository + 'static,
    S: PrivacySettingsRepository + 'static,
    O: OwnerProfileRepository + 'static,
{
    let Repositories {
        tags,
        pets,
        privacy,
        profiles,
        scan_log,
    } = repos;
    let Collaborators {
        identity,
        storage,
        geocoder,
        email,
        clock,
    } = collaborators;
    let base_url = settings.base_url().to_owned();

    let notifications = Arc::new(NotificationService::new(email));
    let profile_service = Arc::new(OwnerProfileService::new(profiles.clone()));
    let pet_service = Arc::new(PetService::new(pets.clone(), storage, clock.clone()));
    let privacy_service = Arc::new(PrivacySettingsService::new(pets.clone(), privacy.clone()));
    let association = Arc::new(TagAssociationService::new(
        tags.clone(),
        pets.clone(),
        clock.clone(),
    ));
    let scan = Arc::new(ScanService::new(
        tags.clone(),
        pets,
        privacy,
        profiles.clone(),
        FinderCollaborators {
            scan_log,
            geocoder,
            notifier: notifications.clone(),
            clock: clock.clone(),
            location_ttl: settings.location_ttl(),
        },
    ));

    HttpStatePorts {
        accounts: Arc::new(AccountService::new(identity, profiles)),
        profile_query: profile_service.clone(),
        profile_command: profile_service,
        pets_query: pet_service.clone(),
        pets_command: pet_service,
        privacy_query: privacy_service.clone(),
        privacy_command: privacy_service,
        association_query: association.clone(),
        association_command: association,
        scan: scan.clone(),
        finder: scan,
        notifications,
        tag_issuance: Arc::new(TagIssuanceService::new(
            tags.clone(),
            clock,
            operator_email(settings),
            base_url.clone(),
        )),
        artwork: Arc::new(TagArtworkService::new(
            tags,
            Arc::new(QrArtworkRenderer),
            base_url,
        )),
    }
}

/// Ports backed by a process-local store.
///
/// # Errors
/// Returns an error when an outbound HTTP client cannot be constructed or a
/// configured URL is malformed.
pub fn memory_ports(settings: &AppSettings, store: Arc<InMemoryStore>) -> io::Result<HttpStatePorts> {
    let collaborators = build_collaborators(settings)?;
    let repos = Repositories {
        tags: store.clone(),
        pets: store.clone(),
        privacy: store.clone(),
        profiles: store.clone(),
        scan_log: store,
    };
    Ok(wire_ports(repos, collaborators, settings))
}

/// Ports backed by PostgreSQL.
///
/// # Errors
/// Returns an error when an outbound HTTP client cannot be constructed or a
/// configured URL is malformed.
pub fn diesel_ports(settings: &AppSettings, pool: &DbPool) -> io::Result<HttpStatePorts> {
    let collaborators = build_collaborators(settings)?;
    let repos = Repositories {
        tags: Arc::new(DieselTagRepository::new(pool.clone())),
        pets: Arc::new(DieselPetRepository::new(pool.clone())),
        privacy: Arc::new(DieselPrivacySettingsRepository::new(pool.clone())),
        profiles: Arc::new(DieselOwnerProfileRepository::new(pool.clone())),
        scan_log: Arc::new(DieselScanLogRepository::new(pool.clone())),
    };
    Ok(wire_ports(repos, collaborators, settings))
}

/// Build the shared HTTP state, using the database when a pool is present.
///
/// In memory mode the demo tag [`DEMO_TAG_CODE`] is provisioned.
///
/// # Errors
/// Propagates failures from [`memory_ports`] and [`diesel_ports`].
pub fn build_http_state(settings: &AppSettings, pool: Option<&DbPool>) -> io::Result<HttpState> {
    let ports = match pool {
        Some(pool) => diesel_ports(settings, pool)?,
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            let store = Arc::new(InMemoryStore::new());
            let code =
                TagCode::new(DEMO_TAG_CODE).map_err(|e| other_error("demo tag code", e))?;
            if store.seed_tag(code).is_some() {
                info!(code = DEMO_TAG_CODE, "demo tag provisioned");
            }
            memory_ports(settings, store)?
        }
    };
    Ok(HttpState::new(ports))
}
