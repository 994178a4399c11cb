//! Per-pet privacy settings and the projection applied before owner contact
//! details reach a finder.
//!
//! The projection is deliberately strict: each field is shown only when its
//! flag is present and `true`. Missing settings hide everything except the
//! custom message, which is always passed through when one exists.

use serde::{Deserialize, Serialize};

use crate::domain::{OwnerProfile, PetId, non_blank};

/// Owner-controlled visibility flags for one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySettings {
    /// Pet the settings belong to.
    pub pet_id: PetId,
    /// Show the owner's name.
    pub show_name: bool,
    /// Show the owner's email.
    pub show_email: bool,
    /// Show the owner's phone.
    pub show_phone: bool,
    /// Show the owner's address.
    pub show_address: bool,
    /// Free text shown to anyone who scans the tag.
    pub custom_message: Option<String>,
}

impl PrivacySettings {
    /// Settings created alongside every new pet: everything visible.
    pub fn defaults(pet_id: PetId) -> Self {
        Self {
            pet_id,
            show_name: true,
            show_email: true,
            show_phone: true,
            show_address: true,
            custom_message: None,
        }
    }

    /// Apply a settings form update.
    #[must_use]
    pub fn apply(self, update: PrivacyUpdate) -> Self {
        Self {
            show_name: update.show_name,
            show_email: update.show_email,
            show_phone: update.show_phone,
            show_address: update.show_address,
            custom_message: update.custom_message,
            ..self
        }
    }
}

/// Normalised settings form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivacyUpdate {
    show_name: bool,
    show_email: bool,
    show_phone: bool,
    show_address: bool,
    custom_message: Option<String>,
}

impl PrivacyUpdate {
    /// Build an update; a blank custom message clears it.
    pub fn new(flags: VisibilityFlags, custom_message: Option<String>) -> Self {
        Self {
            show_name: flags.name,
            show_email: flags.email,
            show_phone: flags.phone,
            show_address: flags.address,
            custom_message: non_blank(custom_message),
        }
    }
}

/// The four visibility toggles as a plain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFlags {
    /// Name toggle.
    pub name: bool,
    /// Email toggle.
    pub email: bool,
    /// Phone toggle.
    pub phone: bool,
    /// Address toggle.
    pub address: bool,
}

/// Owner contact fields a finder is allowed to see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisibleContact {
    /// Owner name.
    pub name: Option<String>,
    /// Owner email.
    pub email: Option<String>,
    /// Owner phone.
    pub phone: Option<String>,
    /// Owner address.
    pub address: Option<String>,
    /// Custom message.
    pub custom_message: Option<String>,
}

/// Projection from owner profile to finder-visible contact.
///
/// # Examples
/// ```
/// use tagpet::domain::{
///     AccountId, EmailAddress, OwnerProfile, PetId, PrivacySettings, VisibilityPolicy,
/// };
///
/// let mut settings = PrivacySettings::defaults(PetId::random());
/// settings.show_phone = false;
/// let profile = OwnerProfile {
///     phone: Some("600000000".into()),
///     address: Some("Calle Mayor 1".into()),
///     ..OwnerProfile::blank(AccountId::random(), EmailAddress::new("o@x.es").expect("email"))
/// };
///
/// let visible = VisibilityPolicy::new(Some(&settings)).project(Some(&profile));
/// assert_eq!(visible.phone, None);
/// assert_eq!(visible.address.as_deref(), Some("Calle Mayor 1"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VisibilityPolicy<'a> {
    settings: Option<&'a PrivacySettings>,
}

impl<'a> VisibilityPolicy<'a> {
    /// Policy for the given settings; `None` hides every field.
    pub const fn new(settings: Option<&'a PrivacySettings>) -> Self {
        Self { settings }
    }

    fn allows(&self, flag: fn(&PrivacySettings) -> bool) -> bool {
        self.settings.is_some_and(flag)
    }

    /// Whether the owner's email may be used to notify them.
    pub fn email_visible(&self) -> bool {
        self.allows(|s| s.show_email)
    }

    /// Whether the owner's phone may be used for a messaging link.
    pub fn phone_visible(&self) -> bool {
        self.allows(|s| s.show_phone)
    }

    /// Apply the policy to an owner profile.
    pub fn project(&self, profile: Option<&OwnerProfile>) -> VisibleContact {
        let pick = |visible: bool, value: Option<String>| value.filter(|_| visible);
        VisibleContact {
            name: pick(
                self.allows(|s| s.show_name),
                profile.and_then(|p| p.full_name.clone()),
            ),
            email: pick(
                self.email_visible(),
                profile.map(|p| p.email.as_ref().to_owned()),
            ),
            phone: pick(self.phone_visible(), profile.and_then(|p| p.phone.clone())),
            address: pick(
                self.allows(|s| s.show_address),
                profile.and_then(|p| p.address.clone()),
            ),
            custom_message: self.settings.and_then(|s| s.custom_message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, EmailAddress};
    use rstest::rstest;

    fn full_profile() -> OwnerProfile {
        OwnerProfile {
            full_name: Some("Ada Lovelace".to_owned()),
            phone: Some("+34 600 111 222".to_owned()),
            address: Some("Calle Mayor 1, Madrid".to_owned()),
            ..OwnerProfile::blank(
                AccountId::random(),
                EmailAddress::new("ada@example.com").expect("email"),
            )
        }
    }

    fn settings(bits: u8) -> PrivacySettings {
        PrivacySettings {
            show_name: bits & 0b0001 != 0,
            show_email: bits & 0b0010 != 0,
            show_phone: bits & 0b0100 != 0,
            show_address: bits & 0b1000 != 0,
            custom_message: Some("Please call me".to_owned()),
            ..PrivacySettings::defaults(PetId::random())
        }
    }

    #[rstest]
    fn every_flag_combination_hides_exactly_the_disabled_fields(
        #[values(
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15
        )]
        bits: u8,
    ) {
        let profile = full_profile();
        let settings = settings(bits);
        let visible = VisibilityPolicy::new(Some(&settings)).project(Some(&profile));

        assert_eq!(visible.name.is_some(), settings.show_name);
        assert_eq!(visible.email.is_some(), settings.show_email);
        assert_eq!(visible.phone.is_some(), settings.show_phone);
        assert_eq!(visible.address.is_some(), settings.show_address);
        assert_eq!(visible.custom_message.as_deref(), Some("Please call me"));
        if settings.show_email {
            assert_eq!(visible.email.as_deref(), Some("ada@example.com"));
        }
    }

    #[rstest]
    fn missing_settings_hide_everything() {
        let visible = VisibilityPolicy::new(None).project(Some(&full_profile()));
        assert_eq!(visible, VisibleContact::default());
    }

    #[rstest]
    fn missing_profile_still_passes_custom_message() {
        let settings = settings(0b1111);
        let visible = VisibilityPolicy::new(Some(&settings)).project(None);
        assert_eq!(visible.name, None);
        assert_eq!(visible.custom_message.as_deref(), Some("Please call me"));
    }

    #[rstest]
    fn update_clears_blank_custom_message() {
        let flags = VisibilityFlags {
            name: false,
            email: true,
            phone: false,
            address: true,
        };
        let updated = PrivacySettings::defaults(PetId::random())
            .apply(PrivacyUpdate::new(flags, Some("   ".to_owned())));
        assert!(!updated.show_name);
        assert!(updated.show_address);
        assert_eq!(updated.custom_message, None);
    }
}
