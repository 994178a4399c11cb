//! Scan resolution and finder contact types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::{PetId, TagCode, TagId, VisibleContact, non_blank};

const WHATSAPP_BASE_URL: &str = "https://wa.me/";

/// Validation failures for finder-supplied values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinderInputError {
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude must be within [-90, 90]")]
    LatitudeOutOfRange,
    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude must be within [-180, 180]")]
    LongitudeOutOfRange,
    /// Contact method outside the supported set.
    #[error("contact method must be email or whatsapp, got {value}")]
    UnknownContactMethod { value: String },
    /// Finder contact was blank.
    #[error("finder contact must not be empty")]
    EmptyFinderContact,
}

impl FinderInputError {
    /// Payload field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::LatitudeOutOfRange => "latitude",
            Self::LongitudeOutOfRange => "longitude",
            Self::UnknownContactMethod { .. } => "method",
            Self::EmptyFinderContact => "finderContact",
        }
    }
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate a latitude/longitude pair.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, FinderInputError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(FinderInputError::LatitudeOutOfRange);
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(FinderInputError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Map link centred on the coordinates.
    pub fn map_link(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Coordinates plus an optional human-readable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Position.
    pub coordinates: Coordinates,
    /// Reverse-geocoded or finder-typed address.
    pub address: Option<String>,
}

impl GeoLocation {
    /// Build a location, dropping a blank address.
    pub fn new(coordinates: Coordinates, address: Option<String>) -> Self {
        Self {
            coordinates,
            address: non_blank(address),
        }
    }
}

/// Location captured for a finder, valid until `expires_at`.
///
/// Stored in the finder's session between the location prompt and the
/// contact submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinderLocation {
    /// Tag being scanned when the location was taken.
    pub code: TagCode,
    /// Captured location.
    pub location: GeoLocation,
    /// Capture time.
    pub captured_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

impl FinderLocation {
    /// Capture a location that stays valid for `ttl`.
    pub fn capture(
        code: TagCode,
        location: GeoLocation,
        captured_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            code,
            location,
            captured_at,
            expires_at: captured_at + ttl,
        }
    }

    /// The location if it belongs to `code` and has not expired at `now`.
    pub fn usable_for(self, code: &TagCode, now: DateTime<Utc>) -> Option<GeoLocation> {
        (self.code == *code && now < self.expires_at).then_some(self.location)
    }
}

/// Channel a finder chose to reach the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    /// Email through the notification dispatcher.
    Email,
    /// Messaging deep link to the owner's phone.
    WhatsApp,
}

impl ContactMethod {
    /// Stored representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::WhatsApp => "whatsapp",
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactMethod {
    type Err = FinderInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "whatsapp" => Ok(Self::WhatsApp),
            other => Err(FinderInputError::UnknownContactMethod {
                value: other.to_owned(),
            }),
        }
    }
}

/// Pet fields shown on the public scan page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundPet {
    /// Pet identifier.
    pub id: PetId,
    /// Pet name.
    pub name: String,
    /// Breed.
    pub breed: Option<String>,
    /// Photo URL.
    pub photo_url: Option<String>,
}

/// Outcome of looking up a scanned code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResolution {
    /// No tag carries this code.
    NotFound {
        /// Scanned code.
        code: TagCode,
    },
    /// The tag exists but nobody has claimed it yet.
    Unassociated {
        /// Scanned code.
        code: TagCode,
        /// Where an owner can claim the tag.
        association_path: String,
    },
    /// The tag belongs to a pet.
    Associated {
        /// Scanned code.
        code: TagCode,
        /// Pet, when the tag still resolves to one.
        pet: Option<FoundPet>,
        /// Owner fields allowed by the pet's privacy settings.
        contact: VisibleContact,
    },
}

/// Validated finder contact submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FinderContact {
    /// Chosen channel.
    pub method: ContactMethod,
    /// How the owner can reach the finder.
    pub finder_contact: String,
    /// Free-text message.
    pub message: Option<String>,
    /// Location to share, already filtered by the finder's consent.
    pub location: Option<GeoLocation>,
}

impl FinderContact {
    /// Validate a submission.
    pub fn try_new(
        method: ContactMethod,
        finder_contact: &str,
        message: Option<String>,
        location: Option<GeoLocation>,
    ) -> Result<Self, FinderInputError> {
        let finder_contact = finder_contact.trim();
        if finder_contact.is_empty() {
            return Err(FinderInputError::EmptyFinderContact);
        }
        Ok(Self {
            method,
            finder_contact: finder_contact.to_owned(),
            message: non_blank(message),
            location,
        })
    }

    /// Build the messaging deep link for `phone`, or `None` when the phone
    /// has no digits.
    ///
    /// # Examples
    /// ```
    /// use tagpet::domain::{ContactMethod, FinderContact};
    ///
    /// let contact = FinderContact::try_new(ContactMethod::WhatsApp, "Luis 611", None, None)
    ///     .expect("valid");
    /// let link = contact.whatsapp_link("+34 600-111-222", "Luna").expect("link");
    /// assert!(link.starts_with("https://wa.me/34600111222?text="));
    /// ```
    pub fn whatsapp_link(&self, phone: &str, pet_name: &str) -> Option<String> {
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }
        let text = self.whatsapp_text(pet_name);
        let base = format!("{WHATSAPP_BASE_URL}{digits}");
        Url::parse_with_params(&base, &[("text", text.as_str())])
            .ok()
            .map(String::from)
    }

    fn whatsapp_text(&self, pet_name: &str) -> String {
        let mut text = format!("Hello, I found your pet {pet_name}. ");
        if let Some(location) = &self.location {
            if let Some(address) = &location.address {
                text.push_str(&format!("📍 Location: {address} "));
            }
            text.push_str(&format!("(Coordinates: {}) ", location.coordinates));
        }
        text.push_str(&format!("My contact details: {}. ", self.finder_contact));
        if let Some(message) = &self.message {
            text.push_str(&format!("Message: {message}"));
        }
        text.trim_end().to_owned()
    }
}

/// How a finder submission reached the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactDelivery {
    /// The owner was emailed.
    EmailSent {
        /// Provider message identifier.
        message_id: String,
    },
    /// The email attempt failed; the submission was still logged.
    EmailFailed {
        /// Failure description safe to show the finder.
        reason: String,
    },
    /// A messaging link was produced for the finder to open.
    WhatsAppLink {
        /// Deep link.
        url: String,
    },
    /// The owner hides the channel the finder chose.
    ChannelHidden,
}

impl ContactDelivery {
    /// Whether a message actually left through the chosen channel.
    pub const fn message_sent(&self) -> bool {
        matches!(self, Self::EmailSent { .. } | Self::WhatsAppLink { .. })
    }
}

/// Append-only audit row for one finder submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanLogEntry {
    /// Row identifier.
    pub id: Uuid,
    /// Scanned tag.
    pub tag_id: TagId,
    /// Resolved pet.
    pub pet_id: Option<PetId>,
    /// Chosen channel.
    pub contact_method: ContactMethod,
    /// Finder contact string.
    pub contact_info: String,
    /// Finder message.
    pub message: Option<String>,
    /// Shared location, if any.
    pub location: Option<GeoLocation>,
    /// Whether the message went out.
    pub message_sent: bool,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}
