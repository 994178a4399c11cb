//! Pets and the stored files attached to them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AccountId, TagCode, TagId, non_blank};

/// Name given to a pet created straight from the association flow.
pub const PLACEHOLDER_PET_NAME: &str = "New pet";
/// Bucket holding pet photos.
pub const PET_PHOTOS_BUCKET: &str = "pet-photos";
/// Bucket holding vaccine documents.
pub const VACCINE_DOCUMENTS_BUCKET: &str = "vaccine-pdfs";

const MAX_NAME_LEN: usize = 80;
const MAX_AGE_YEARS: u16 = 60;

/// Storage identifier of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PetId(Uuid);

impl PetId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for pet form values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PetValidationError {
    /// Name was blank.
    #[error("pet name must not be empty")]
    EmptyName,
    /// Name exceeded the maximum length.
    #[error("pet name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// Age outside the plausible range.
    #[error("pet age must be between 0 and {max} years")]
    AgeOutOfRange { max: u16 },
}

impl PetValidationError {
    /// Payload field the failure refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::AgeOutOfRange { .. } => "age",
        }
    }
}

/// Validated pet form values shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetDraft {
    name: String,
    breed: Option<String>,
    age: Option<u16>,
    photo_url: Option<String>,
    vaccine_pdf_url: Option<String>,
}

impl PetDraft {
    /// Validate raw form values.
    ///
    /// # Examples
    /// ```
    /// use tagpet::domain::PetDraft;
    ///
    /// let draft = PetDraft::try_new(" Luna ", Some("Galgo".into()), Some(3), None, None)
    ///     .expect("valid pet");
    /// assert_eq!(draft.name(), "Luna");
    /// assert!(PetDraft::try_new("  ", None, None, None, None).is_err());
    /// ```
    pub fn try_new(
        name: &str,
        breed: Option<String>,
        age: Option<i64>,
        photo_url: Option<String>,
        vaccine_pdf_url: Option<String>,
    ) -> Result<Self, PetValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PetValidationError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(PetValidationError::NameTooLong { max: MAX_NAME_LEN });
        }
        let age = age
            .map(|years| {
                u16::try_from(years)
                    .ok()
                    .filter(|years| *years <= MAX_AGE_YEARS)
                    .ok_or(PetValidationError::AgeOutOfRange { max: MAX_AGE_YEARS })
            })
            .transpose()?;
        Ok(Self {
            name: name.to_owned(),
            breed: non_blank(breed),
            age,
            photo_url: non_blank(photo_url),
            vaccine_pdf_url: non_blank(vaccine_pdf_url),
        })
    }

    /// Draft used when a tag is bound to a brand-new pet.
    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_PET_NAME.to_owned(),
            breed: None,
            age: None,
            photo_url: None,
            vaccine_pdf_url: None,
        }
    }

    /// Trimmed pet name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Breed, if given.
    pub fn breed(&self) -> Option<&str> {
        self.breed.as_deref()
    }

    /// Age in years, if given.
    pub fn age(&self) -> Option<u16> {
        self.age
    }

    /// Public photo URL, if uploaded.
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Public vaccine document URL, if uploaded.
    pub fn vaccine_pdf_url(&self) -> Option<&str> {
        self.vaccine_pdf_url.as_deref()
    }
}

/// Pet row as seen by the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    /// Storage identifier.
    pub id: PetId,
    /// Owning account.
    pub owner: AccountId,
    /// Display name.
    pub name: String,
    /// Breed.
    pub breed: Option<String>,
    /// Age in years.
    pub age: Option<u16>,
    /// Public photo URL.
    pub photo_url: Option<String>,
    /// Public vaccine document URL.
    pub vaccine_pdf_url: Option<String>,
    /// Tag bound to the pet.
    pub tag_id: Option<TagId>,
    /// Code of the bound tag, joined for display.
    pub tag_code: Option<TagCode>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Pet {
    /// Build a pet row from a validated draft.
    pub fn from_draft(owner: AccountId, draft: &PetDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: PetId::random(),
            owner,
            name: draft.name.clone(),
            breed: draft.breed.clone(),
            age: draft.age,
            photo_url: draft.photo_url.clone(),
            vaccine_pdf_url: draft.vaccine_pdf_url.clone(),
            tag_id: None,
            tag_code: None,
            created_at,
        }
    }

    /// Replace the editable fields, keeping identity, owner and tag.
    #[must_use]
    pub fn with_draft(self, draft: &PetDraft) -> Self {
        Self {
            name: draft.name.clone(),
            breed: draft.breed.clone(),
            age: draft.age,
            photo_url: draft.photo_url.clone(),
            vaccine_pdf_url: draft.vaccine_pdf_url.clone(),
            ..self
        }
    }

    /// Stored objects referenced by this pet.
    pub fn stored_objects(&self) -> Vec<StoredObject> {
        [
            StoredObject::from_public_url(self.photo_url.as_deref(), PET_PHOTOS_BUCKET),
            StoredObject::from_public_url(
                self.vaccine_pdf_url.as_deref(),
                VACCINE_DOCUMENTS_BUCKET,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Objects referenced by `self` that `next` no longer references.
    pub fn replaced_objects(&self, next: &PetDraft) -> Vec<StoredObject> {
        let mut replaced = Vec::new();
        if self.photo_url.as_deref() != next.photo_url() {
            replaced.extend(StoredObject::from_public_url(
                self.photo_url.as_deref(),
                PET_PHOTOS_BUCKET,
            ));
        }
        if self.vaccine_pdf_url.as_deref() != next.vaccine_pdf_url() {
            replaced.extend(StoredObject::from_public_url(
                self.vaccine_pdf_url.as_deref(),
                VACCINE_DOCUMENTS_BUCKET,
            ));
        }
        replaced
    }
}

/// Object-storage location derived from a public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Bucket name.
    pub bucket: &'static str,
    /// Path inside the bucket.
    pub path: String,
}

impl StoredObject {
    /// Extract the object path that follows `/<bucket>/` in a public URL.
    ///
    /// # Examples
    /// ```
    /// use tagpet::domain::StoredObject;
    ///
    /// let object = StoredObject::from_public_url(
    ///     Some("https://x.supabase.co/storage/v1/object/public/pet-photos/a/luna.jpg"),
    ///     "pet-photos",
    /// )
    /// .expect("object path");
    /// assert_eq!(object.path, "a/luna.jpg");
    /// ```
    pub fn from_public_url(url: Option<&str>, bucket: &'static str) -> Option<Self> {
        let marker = format!("/{bucket}/");
        let (_, tail) = url?.split_once(marker.as_str())?;
        let path = tail.split(['?', '#']).next().unwrap_or_default();
        (!path.is_empty()).then(|| Self {
            bucket,
            path: path.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pet_with_files(photo: Option<&str>, pdf: Option<&str>) -> Pet {
        let draft = PetDraft::try_new(
            "Luna",
            None,
            None,
            photo.map(str::to_owned),
            pdf.map(str::to_owned),
        )
        .expect("draft");
        Pet::from_draft(AccountId::random(), &draft, Utc::now())
    }

    #[rstest]
    #[case(Some(-1))]
    #[case(Some(61))]
    fn rejects_out_of_range_ages(#[case] age: Option<i64>) {
        let err = PetDraft::try_new("Luna", None, age, None, None).expect_err("bad age");
        assert_eq!(err.field(), "age");
    }

    #[rstest]
    fn blank_optional_fields_are_cleared() {
        let draft = PetDraft::try_new("Luna", Some(" ".into()), Some(0), Some("".into()), None)
            .expect("valid");
        assert_eq!(draft.breed(), None);
        assert_eq!(draft.age(), Some(0));
        assert_eq!(draft.photo_url(), None);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("https://cdn.example/other-bucket/a.png"), None)]
    #[case(Some("https://cdn.example/pet-photos/"), None)]
    #[case(
        Some("https://cdn.example/storage/v1/object/public/pet-photos/u1/a.png?t=1"),
        Some("u1/a.png")
    )]
    fn extracts_object_paths(#[case] url: Option<&str>, #[case] expected: Option<&str>) {
        let object = StoredObject::from_public_url(url, PET_PHOTOS_BUCKET);
        assert_eq!(object.as_ref().map(|o| o.path.as_str()), expected);
    }

    #[rstest]
    fn stored_objects_cover_both_buckets() {
        let pet = pet_with_files(
            Some("https://cdn.example/pet-photos/p.jpg"),
            Some("https://cdn.example/vaccine-pdfs/v.pdf"),
        );
        let objects = pet.stored_objects();
        assert_eq!(
            objects,
            vec![
                StoredObject {
                    bucket: PET_PHOTOS_BUCKET,
                    path: "p.jpg".to_owned()
                },
                StoredObject {
                    bucket: VACCINE_DOCUMENTS_BUCKET,
                    path: "v.pdf".to_owned()
                },
            ]
        );
    }

    #[rstest]
    fn replaced_objects_only_lists_changed_files() {
        let pet = pet_with_files(
            Some("https://cdn.example/pet-photos/old.jpg"),
            Some("https://cdn.example/vaccine-pdfs/v.pdf"),
        );
        let next = PetDraft::try_new(
            "Luna",
            None,
            None,
            Some("https://cdn.example/pet-photos/new.jpg".into()),
            Some("https://cdn.example/vaccine-pdfs/v.pdf".into()),
        )
        .expect("draft");

        let replaced = pet.replaced_objects(&next);
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced.first().map(|o| o.path.as_str()), Some("old.jpg"));
    }

    #[rstest]
    fn with_draft_keeps_identity_and_tag() {
        let mut pet = pet_with_files(None, None);
        pet.tag_id = Some(TagId::random());
        let id = pet.id;
        let tag = pet.tag_id;
        let draft = PetDraft::try_new("Max", Some("Mastín".into()), Some(4), None, None)
            .expect("draft");
        let updated = pet.with_draft(&draft);
        assert_eq!(updated.id, id);
        assert_eq!(updated.tag_id, tag);
        assert_eq!(updated.name, "Max");
    }
}
