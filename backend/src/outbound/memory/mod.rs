//! In-memory persistence used when no database is configured.
//!
//! One [`InMemoryStore`] implements every repository port behind a single
//! mutex, so multi-table operations such as binding a tag or deleting a pet
//! are atomic the same way the Diesel transactions are.

mod identity;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    BindTarget, OwnerProfileRepository, OwnerProfileRepositoryError, PetRepository,
    PetRepositoryError, PrivacySettingsRepository, PrivacySettingsRepositoryError,
    ScanLogRepository, ScanLogRepositoryError, TagBinding, TagRepository, TagRepositoryError,
};
use crate::domain::{
    AccountId, OwnerProfile, Pet, PetId, PrivacySettings, ScanLogEntry, Tag, TagCode, TagId,
};

pub use identity::InMemoryIdentityProvider;

#[derive(Default)]
struct Tables {
    tags: HashMap<TagId, Tag>,
    pets: HashMap<PetId, Pet>,
    privacy: HashMap<PetId, PrivacySettings>,
    profiles: HashMap<AccountId, OwnerProfile>,
    scan_logs: Vec<ScanLogEntry>,
}

impl Tables {
    fn with_tag_code(&self, mut pet: Pet) -> Pet {
        pet.tag_code = pet
            .tag_id
            .and_then(|id| self.tags.get(&id))
            .map(|tag| tag.code.clone());
        pet
    }

    fn owned_pets(&self, owner: &AccountId) -> Vec<Pet> {
        let mut pets: Vec<Pet> = self
            .pets
            .values()
            .filter(|pet| pet.owner == *owner)
            .map(|pet| self.with_tag_code(pet.clone()))
            .collect();
        pets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        pets
    }
}

/// Process-local store backing every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, &'static str> {
        self.tables.lock().map_err(|_| POISONED)
    }

    /// Register an unassociated tag, returning it. Existing codes are kept.
    ///
    /// Used to provision demo and test tags such as `QR000TEST`.
    pub fn seed_tag(&self, code: TagCode) -> Option<Tag> {
        let mut tables = self.lock().ok()?;
        if let Some(existing) = tables.tags.values().find(|tag| tag.code == code) {
            return Some(existing.clone());
        }
        let tag = Tag::unassociated(code);
        tables.tags.insert(tag.id, tag.clone());
        Some(tag)
    }

    /// Snapshot of the scan log in insertion order.
    pub fn scan_logs(&self) -> Vec<ScanLogEntry> {
        self.lock()
            .map(|tables| tables.scan_logs.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_code(&self, code: &TagCode) -> Result<Option<Tag>, TagRepositoryError> {
        let tables = self.lock().map_err(TagRepositoryError::query)?;
        Ok(tables.tags.values().find(|tag| tag.code == *code).cloned())
    }

    async fn insert(&self, tag: &Tag) -> Result<(), TagRepositoryError> {
        let mut tables = self.lock().map_err(TagRepositoryError::query)?;
        if tables.tags.values().any(|existing| existing.code == tag.code) {
            return Err(TagRepositoryError::duplicate_code(tag.code.as_ref()));
        }
        tables.tags.insert(tag.id, tag.clone());
        Ok(())
    }

    async fn release_orphan(&self, tag_id: &TagId) -> Result<bool, TagRepositoryError> {
        let mut tables = self.lock().map_err(TagRepositoryError::query)?;
        if tables.pets.values().any(|pet| pet.tag_id == Some(*tag_id)) {
            return Ok(false);
        }
        let Some(tag) = tables.tags.get_mut(tag_id) else {
            return Ok(false);
        };
        tag.is_associated = false;
        tag.owner = None;
        tag.associated_at = None;
        Ok(true)
    }

    async fn bind(&self, binding: TagBinding) -> Result<PetId, TagRepositoryError> {
        let mut tables = self.lock().map_err(TagRepositoryError::query)?;
        let tag = tables
            .tags
            .get(&binding.tag_id)
            .ok_or_else(|| TagRepositoryError::query("tag disappeared before binding"))?;
        if tag.is_associated {
            return Err(TagRepositoryError::already_associated(tag.code.as_ref()));
        }

        let pet_id = match &binding.target {
            BindTarget::NewPet(draft) => {
                let pet = Pet::from_draft(binding.account, draft, binding.associated_at);
                let id = pet.id;
                tables.privacy.insert(id, PrivacySettings::defaults(id));
                tables.pets.insert(id, pet);
                id
            }
            BindTarget::Existing(id) => {
                let claimable = tables
                    .pets
                    .get(id)
                    .is_some_and(|pet| pet.owner == binding.account && pet.tag_id.is_none());
                if !claimable {
                    return Err(TagRepositoryError::pet_unavailable());
                }
                *id
            }
        };

        if let Some(pet) = tables.pets.get_mut(&pet_id) {
            pet.tag_id = Some(binding.tag_id);
        }
        if let Some(tag) = tables.tags.get_mut(&binding.tag_id) {
            tag.is_associated = true;
            tag.owner = Some(binding.account);
            tag.associated_at = Some(binding.associated_at);
        }
        Ok(pet_id)
    }
}

#[async_trait]
impl PetRepository for InMemoryStore {
    async fn list_for_owner(&self, owner: &AccountId) -> Result<Vec<Pet>, PetRepositoryError> {
        let tables = self.lock().map_err(PetRepositoryError::query)?;
        Ok(tables.owned_pets(owner))
    }

    async fn list_untagged_for_owner(
        &self,
        owner: &AccountId,
    ) -> Result<Vec<Pet>, PetRepositoryError> {
        let tables = self.lock().map_err(PetRepositoryError::query)?;
        let mut pets = tables.owned_pets(owner);
        pets.retain(|pet| pet.tag_id.is_none());
        Ok(pets)
    }

    async fn find_for_owner(
        &self,
        owner: &AccountId,
        id: &PetId,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        let tables = self.lock().map_err(PetRepositoryError::query)?;
        Ok(tables
            .pets
            .get(id)
            .filter(|pet| pet.owner == *owner)
            .map(|pet| tables.with_tag_code(pet.clone())))
    }

    async fn find_by_tag(&self, tag_id: &TagId) -> Result<Option<Pet>, PetRepositoryError> {
        let tables = self.lock().map_err(PetRepositoryError::query)?;
        Ok(tables
            .pets
            .values()
            .find(|pet| pet.tag_id == Some(*tag_id))
            .map(|pet| tables.with_tag_code(pet.clone())))
    }

    async fn create(&self, pet: &Pet) -> Result<(), PetRepositoryError> {
        let mut tables = self.lock().map_err(PetRepositoryError::query)?;
        tables
            .privacy
            .insert(pet.id, PrivacySettings::defaults(pet.id));
        tables.pets.insert(pet.id, pet.clone());
        Ok(())
    }

    async fn update(&self, pet: &Pet) -> Result<(), PetRepositoryError> {
        let mut tables = self.lock().map_err(PetRepositoryError::query)?;
        let stored = tables
            .pets
            .get_mut(&pet.id)
            .filter(|stored| stored.owner == pet.owner)
            .ok_or_else(|| PetRepositoryError::query("pet row vanished during update"))?;
        stored.name.clone_from(&pet.name);
        stored.breed.clone_from(&pet.breed);
        stored.age = pet.age;
        stored.photo_url.clone_from(&pet.photo_url);
        stored.vaccine_pdf_url.clone_from(&pet.vaccine_pdf_url);
        Ok(())
    }

    async fn delete_releasing_tag(
        &self,
        owner: &AccountId,
        id: &PetId,
    ) -> Result<bool, PetRepositoryError> {
        let mut tables = self.lock().map_err(PetRepositoryError::query)?;
        if !tables.pets.get(id).is_some_and(|pet| pet.owner == *owner) {
            return Ok(false);
        }
        let removed = tables.pets.remove(id);
        tables.privacy.remove(id);
        for entry in &mut tables.scan_logs {
            if entry.pet_id == Some(*id) {
                entry.pet_id = None;
            }
        }
        if let Some(tag) = removed
            .and_then(|pet| pet.tag_id)
            .and_then(|tag_id| tables.tags.get_mut(&tag_id))
        {
            tag.is_associated = false;
            tag.owner = None;
            tag.associated_at = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl PrivacySettingsRepository for InMemoryStore {
    async fn find_by_pet(
        &self,
        pet_id: &PetId,
    ) -> Result<Option<PrivacySettings>, PrivacySettingsRepositoryError> {
        let tables = self.lock().map_err(PrivacySettingsRepositoryError::query)?;
        Ok(tables.privacy.get(pet_id).cloned())
    }

    async fn upsert(&self, settings: &PrivacySettings) -> Result<(), PrivacySettingsRepositoryError> {
        let mut tables = self.lock().map_err(PrivacySettingsRepositoryError::query)?;
        tables.privacy.insert(settings.pet_id, settings.clone());
        Ok(())
    }
}

#[async_trait]
impl OwnerProfileRepository for InMemoryStore {
    async fn find(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<OwnerProfile>, OwnerProfileRepositoryError> {
        let tables = self.lock().map_err(OwnerProfileRepositoryError::query)?;
        Ok(tables.profiles.get(account_id).cloned())
    }

    async fn upsert(&self, profile: &OwnerProfile) -> Result<(), OwnerProfileRepositoryError> {
        let mut tables = self.lock().map_err(OwnerProfileRepositoryError::query)?;
        tables.profiles.insert(profile.account_id, profile.clone());
        Ok(())
    }
}

#[async_trait]
impl ScanLogRepository for InMemoryStore {
    async fn append(&self, entry: &ScanLogEntry) -> Result<(), ScanLogRepositoryError> {
        let mut tables = self.lock().map_err(ScanLogRepositoryError::query)?;
        tables.scan_logs.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PetDraft;
    use crate::domain::test_clock::fixture_timestamp;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    fn seeded(store: &InMemoryStore) -> Tag {
        store
            .seed_tag(TagCode::new("QR000TEST").expect("code"))
            .expect("seeded")
    }

    fn new_pet_binding(tag: &Tag, account: AccountId) -> TagBinding {
        TagBinding {
            tag_id: tag.id,
            account,
            target: BindTarget::NewPet(PetDraft::placeholder()),
            associated_at: fixture_timestamp(),
        }
    }

    #[rstest]
    fn seeding_is_idempotent(store: InMemoryStore) {
        let first = seeded(&store);
        let second = seeded(&store);
        assert_eq!(first.id, second.id);
    }

    #[rstest]
    #[tokio::test]
    async fn binding_a_new_pet_links_both_sides(store: InMemoryStore) {
        let tag = seeded(&store);
        let account = AccountId::random();
        let pet_id = store
            .bind(new_pet_binding(&tag, account))
            .await
            .expect("bound");

        let stored = store
            .find_by_code(&tag.code)
            .await
            .expect("query")
            .expect("tag");
        assert!(stored.is_associated);
        assert_eq!(stored.owner, Some(account));
        let pet = store.find_by_tag(&tag.id).await.expect("query").expect("pet");
        assert_eq!(pet.id, pet_id);
        assert_eq!(pet.tag_code, Some(tag.code.clone()));
        assert!(store.find_by_pet(&pet_id).await.expect("query").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn second_binding_is_refused(store: InMemoryStore) {
        let tag = seeded(&store);
        store
            .bind(new_pet_binding(&tag, AccountId::random()))
            .await
            .expect("first bind");
        let err = store
            .bind(new_pet_binding(&tag, AccountId::random()))
            .await
            .expect_err("second bind");
        assert!(matches!(err, TagRepositoryError::AlreadyAssociated { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_pet_releases_its_tag(store: InMemoryStore) {
        let tag = seeded(&store);
        let account = AccountId::random();
        let pet_id = store
            .bind(new_pet_binding(&tag, account))
            .await
            .expect("bound");

        assert!(
            !store
                .delete_releasing_tag(&AccountId::random(), &pet_id)
                .await
                .expect("query"),
            "strangers cannot delete"
        );
        assert!(
            store
                .delete_releasing_tag(&account, &pet_id)
                .await
                .expect("query")
        );
        let released = store
            .find_by_code(&tag.code)
            .await
            .expect("query")
            .expect("tag");
        assert!(!released.is_associated);
        assert_eq!(released.owner, None);
        assert!(store.find_by_pet(&pet_id).await.expect("query").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn release_orphan_skips_tags_with_pets(store: InMemoryStore) {
        let tag = seeded(&store);
        store
            .bind(new_pet_binding(&tag, AccountId::random()))
            .await
            .expect("bound");
        assert!(!store.release_orphan(&tag.id).await.expect("query"));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_codes_are_rejected(store: InMemoryStore) {
        let tag = seeded(&store);
        let err = store
            .insert(&Tag::unassociated(tag.code))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, TagRepositoryError::DuplicateCode { .. }));
    }
}
