//! Public scan flow: resolving codes, capturing finder locations, contacting
//! owners, and the email dispatcher used to notify them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    ContactSubmission, EmailSender, EmailSenderError, FinderContactCommand, NotificationDispatch,
    OwnerProfileRepository, OwnerProfileRepositoryError, PetRepository,
    PrivacySettingsRepository, PrivacySettingsRepositoryError, ReverseGeocoder, ScanLogRepository,
    ScanLogRepositoryError, ScanQuery, TagRepository, TagRepositoryError,
};
use crate::domain::{
    ContactDelivery, ContactMethod, Coordinates, EmailAddress, Error, FinderLocation, FoundPet,
    FoundPetNotification, GeoLocation, Pet, ScanLogEntry, ScanResolution, Tag, TagCode,
    VisibilityPolicy, VisibleContact,
};

/// Collaborators used only by finder actions.
#[derive(Clone)]
pub struct FinderCollaborators {
    /// Append-only scan log.
    pub scan_log: Arc<dyn ScanLogRepository>,
    /// Address lookup for captured coordinates.
    pub geocoder: Arc<dyn ReverseGeocoder>,
    /// Owner email dispatcher.
    pub notifier: Arc<dyn NotificationDispatch>,
    /// Time source for location expiry and log timestamps.
    pub clock: Arc<dyn Clock>,
    /// How long a captured location stays usable.
    pub location_ttl: Duration,
}

/// Scan service implementing [`ScanQuery`] and [`FinderContactCommand`].
#[derive(Clone)]
pub struct ScanService<T, P, S, O> {
    tags: Arc<T>,
    pets: Arc<P>,
    privacy: Arc<S>,
    profiles: Arc<O>,
    finder: FinderCollaborators,
}

impl<T, P, S, O> ScanService<T, P, S, O> {
    /// Create a new service with the given collaborators.
    pub fn new(
        tags: Arc<T>,
        pets: Arc<P>,
        privacy: Arc<S>,
        profiles: Arc<O>,
        finder: FinderCollaborators,
    ) -> Self {
        Self {
            tags,
            pets,
            privacy,
            profiles,
            finder,
        }
    }
}

/// Owner-side data reachable from a scanned tag, already filtered by privacy.
struct OwnerView {
    pet: Option<Pet>,
    policy_contact: VisibleContact,
    email_target: Option<EmailAddress>,
    phone_target: Option<String>,
}

impl<T, P, S, O> ScanService<T, P, S, O>
where
    T: TagRepository,
    P: PetRepository,
    S: PrivacySettingsRepository,
    O: OwnerProfileRepository,
{
    fn map_tag_error(error: TagRepositoryError) -> Error {
        match error {
            TagRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("tag repository unavailable: {message}"))
            }
            other => Error::internal(format!("tag repository error: {other}")),
        }
    }

    fn map_privacy_error(error: PrivacySettingsRepositoryError) -> Error {
        match error {
            PrivacySettingsRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("privacy repository unavailable: {message}"))
            }
            PrivacySettingsRepositoryError::Query { message } => {
                Error::internal(format!("privacy repository error: {message}"))
            }
        }
    }

    fn map_profile_error(error: OwnerProfileRepositoryError) -> Error {
        match error {
            OwnerProfileRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("profile repository unavailable: {message}"))
            }
            OwnerProfileRepositoryError::Query { message } => {
                Error::internal(format!("profile repository error: {message}"))
            }
        }
    }

    fn map_scan_log_error(error: ScanLogRepositoryError) -> Error {
        match error {
            ScanLogRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("scan log unavailable: {message}"))
            }
            ScanLogRepositoryError::Query { message } => {
                Error::internal(format!("scan log error: {message}"))
            }
        }
    }

    async fn find_tag(&self, code: &TagCode) -> Result<Option<Tag>, Error> {
        self.tags
            .find_by_code(code)
            .await
            .map_err(Self::map_tag_error)
    }

    async fn pet_for(&self, tag: &Tag) -> Option<Pet> {
        match self.pets.find_by_tag(&tag.id).await {
            Ok(pet) => pet,
            Err(error) => {
                warn!(tag = %tag.code, %error, "pet lookup failed during scan");
                None
            }
        }
    }

    async fn owner_view(&self, tag: &Tag) -> Result<OwnerView, Error> {
        let Some(pet) = self.pet_for(tag).await else {
            return Ok(OwnerView {
                pet: None,
                policy_contact: VisibleContact::default(),
                email_target: None,
                phone_target: None,
            });
        };
        let settings = self
            .privacy
            .find_by_pet(&pet.id)
            .await
            .map_err(Self::map_privacy_error)?;
        let profile = self
            .profiles
            .find(&pet.owner)
            .await
            .map_err(Self::map_profile_error)?;

        let policy = VisibilityPolicy::new(settings.as_ref());
        let policy_contact = policy.project(profile.as_ref());
        let email_target = profile
            .as_ref()
            .filter(|_| policy.email_visible())
            .map(|p| p.email.clone());
        let phone_target = profile
            .and_then(|p| p.phone)
            .filter(|_| policy.phone_visible());
        Ok(OwnerView {
            pet: Some(pet),
            policy_contact,
            email_target,
            phone_target,
        })
    }
}

#[async_trait]
impl<T, P, S, O> ScanQuery for ScanService<T, P, S, O>
where
    T: TagRepository,
    P: PetRepository,
    S: PrivacySettingsRepository,
    O: OwnerProfileRepository,
{
    async fn resolve(&self, code: &TagCode) -> Result<ScanResolution, Error> {
        let Some(tag) = self.find_tag(code).await? else {
            return Ok(ScanResolution::NotFound { code: code.clone() });
        };
        if !tag.is_associated {
            return Ok(ScanResolution::Unassociated {
                association_path: tag.code.association_path(),
                code: tag.code,
            });
        }
        let view = self.owner_view(&tag).await?;
        Ok(ScanResolution::Associated {
            code: tag.code,
            pet: view.pet.map(|pet| FoundPet {
                id: pet.id,
                name: pet.name,
                breed: pet.breed,
                photo_url: pet.photo_url,
            }),
            contact: view.policy_contact,
        })
    }
}

#[async_trait]
impl<T, P, S, O> FinderContactCommand for ScanService<T, P, S, O>
where
    T: TagRepository,
    P: PetRepository,
    S: PrivacySettingsRepository,
    O: OwnerProfileRepository,
{
    async fn capture_location(
        &self,
        code: &TagCode,
        coordinates: Coordinates,
    ) -> Result<FinderLocation, Error> {
        if self.find_tag(code).await?.is_none() {
            return Err(Error::not_found(format!("tag {code} not found")));
        }
        let address = match self.finder.geocoder.lookup(coordinates).await {
            Ok(address) => address,
            Err(error) => {
                warn!(tag = %code, %error, "reverse geocoding failed");
                None
            }
        };
        Ok(FinderLocation::capture(
            code.clone(),
            GeoLocation::new(coordinates, address),
            self.finder.clock.utc(),
            self.finder.location_ttl,
        ))
    }

    async fn submit(&self, submission: ContactSubmission) -> Result<ContactDelivery, Error> {
        let ContactSubmission {
            code,
            mut contact,
            include_location,
            remembered_location,
        } = submission;
        let now = self.finder.clock.utc();
        contact.location = if include_location {
            contact
                .location
                .take()
                .or_else(|| remembered_location.and_then(|l| l.usable_for(&code, now)))
        } else {
            None
        };

        let tag = self
            .find_tag(&code)
            .await?
            .filter(|tag| tag.is_associated)
            .ok_or_else(|| Error::not_found(format!("tag {code} has no associated pet")))?;
        let view = self.owner_view(&tag).await?;

        let delivery = match view.pet.as_ref() {
            None => {
                warn!(tag = %code, "associated tag has no pet; contact not delivered");
                ContactDelivery::ChannelHidden
            }
            Some(pet) => match contact.method {
                ContactMethod::Email => match view.email_target {
                    Some(to) => {
                        let notification = FoundPetNotification {
                            to,
                            subject: None,
                            pet_name: pet.name.clone(),
                            finder_contact: contact.finder_contact.clone(),
                            message: contact.message.clone(),
                            location: contact.location.clone(),
                        };
                        match self.finder.notifier.dispatch(notification).await {
                            Ok(message_id) => ContactDelivery::EmailSent { message_id },
                            Err(error) => {
                                warn!(tag = %code, %error, "owner notification failed");
                                ContactDelivery::EmailFailed {
                                    reason: error.message().to_owned(),
                                }
                            }
                        }
                    }
                    None => ContactDelivery::ChannelHidden,
                },
                ContactMethod::WhatsApp => view
                    .phone_target
                    .and_then(|phone| contact.whatsapp_link(&phone, &pet.name))
                    .map_or(ContactDelivery::ChannelHidden, |url| {
                        ContactDelivery::WhatsAppLink { url }
                    }),
            },
        };

        let entry = ScanLogEntry {
            id: Uuid::new_v4(),
            tag_id: tag.id,
            pet_id: view.pet.as_ref().map(|pet| pet.id),
            contact_method: contact.method,
            contact_info: contact.finder_contact,
            message: contact.message,
            location: contact.location,
            message_sent: delivery.message_sent(),
            created_at: now,
        };
        self.finder
            .scan_log
            .append(&entry)
            .await
            .map_err(Self::map_scan_log_error)?;
        info!(
            tag = %code,
            method = %entry.contact_method,
            sent = entry.message_sent,
            "finder contact recorded"
        );
        Ok(delivery)
    }
}

/// Email dispatcher implementing [`NotificationDispatch`].
#[derive(Clone)]
pub struct NotificationService<E> {
    sender: Arc<E>,
}

impl<E> NotificationService<E> {
    /// Create a dispatcher over the given email sender.
    pub fn new(sender: Arc<E>) -> Self {
        Self { sender }
    }
}

impl<E: EmailSender> NotificationService<E> {
    fn map_sender_error(error: EmailSenderError) -> Error {
        match error {
            EmailSenderError::NotConfigured => Error::internal("email service not configured")
                .with_details(json!({ "code": "email_not_configured" })),
            EmailSenderError::SandboxRestricted { message } => Error::forbidden(message)
                .with_details(json!({ "code": "email_sandbox_restricted" })),
            EmailSenderError::Rejected { message } | EmailSenderError::Transport { message } => {
                warn!(%message, "email provider failure");
                Error::internal("failed to send email")
                    .with_details(json!({ "code": "email_send_failed" }))
            }
        }
    }
}

#[async_trait]
impl<E: EmailSender> NotificationDispatch for NotificationService<E> {
    async fn dispatch(&self, notification: FoundPetNotification) -> Result<String, Error> {
        let email = notification.render();
        let message_id = self
            .sender
            .send(&email)
            .await
            .map_err(Self::map_sender_error)?;
        info!(%message_id, "found-pet notification sent");
        Ok(message_id)
    }
}

#[cfg(test)]
#[path = "scan_service_tests.rs"]
mod tests;
