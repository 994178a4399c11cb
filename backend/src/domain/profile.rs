//! Owner profile: the contact details a finder may be shown.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, EmailAddress, non_blank};

/// Profile record keyed by the owning account.
///
/// The email is owned by the identity provider and copied here at signup;
/// profile updates never change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerProfile {
    /// Owning account.
    pub account_id: AccountId,
    /// Account email.
    pub email: EmailAddress,
    /// Display name.
    pub full_name: Option<String>,
    /// Phone number in free form.
    pub phone: Option<String>,
    /// Postal address in free form.
    pub address: Option<String>,
}

impl OwnerProfile {
    /// Empty profile for an account that has not filled the form yet.
    pub fn blank(account_id: AccountId, email: EmailAddress) -> Self {
        Self {
            account_id,
            email,
            full_name: None,
            phone: None,
            address: None,
        }
    }

    /// Apply a form update; the email is left untouched.
    #[must_use]
    pub fn apply(self, update: ProfileUpdate) -> Self {
        Self {
            full_name: update.full_name,
            phone: update.phone,
            address: update.address,
            ..self
        }
    }
}

/// Normalised profile form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    full_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl ProfileUpdate {
    /// Build an update, treating blank values as cleared fields.
    pub fn new(full_name: Option<String>, phone: Option<String>, address: Option<String>) -> Self {
        Self {
            full_name: non_blank(full_name),
            phone: non_blank(phone),
            address: non_blank(address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_email_and_clears_blank_fields() {
        let email = EmailAddress::new("owner@example.com").expect("email");
        let profile = OwnerProfile {
            phone: Some("+34 600 000 000".to_owned()),
            ..OwnerProfile::blank(AccountId::random(), email.clone())
        };

        let updated = profile.apply(ProfileUpdate::new(
            Some(" Ada ".to_owned()),
            Some("   ".to_owned()),
            Some("Calle Mayor 1".to_owned()),
        ));

        assert_eq!(updated.email, email);
        assert_eq!(updated.full_name.as_deref(), Some("Ada"));
        assert_eq!(updated.phone, None);
        assert_eq!(updated.address.as_deref(), Some("Calle Mayor 1"));
    }
}
