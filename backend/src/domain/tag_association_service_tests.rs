//! Tests for the tag association service.

use super::*;
use crate::domain::ports::{MockPetRepository, MockTagRepository};
use crate::domain::test_clock::{fixture_clock, fixture_timestamp};
use crate::domain::{ErrorCode, PLACEHOLDER_PET_NAME, Pet};
use rstest::{fixture, rstest};

#[fixture]
fn code() -> TagCode {
    TagCode::new("QR000TEST").expect("code")
}

fn associated(tag: Tag) -> Tag {
    Tag {
        is_associated: true,
        owner: Some(AccountId::random()),
        associated_at: Some(fixture_timestamp()),
        ..tag
    }
}

fn pet_for(owner: AccountId) -> Pet {
    let draft = PetDraft::try_new("Luna", None, None, None, None).expect("draft");
    Pet::from_draft(owner, &draft, fixture_timestamp())
}

fn service(
    tags: MockTagRepository,
    pets: MockPetRepository,
) -> TagAssociationService<MockTagRepository, MockPetRepository> {
    TagAssociationService::new(Arc::new(tags), Arc::new(pets), fixture_clock())
}

#[rstest]
#[tokio::test]
async fn prepare_rejects_unknown_codes(code: TagCode) {
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_code().return_once(|_| Ok(None));

    let err = service(tags, MockPetRepository::new())
        .prepare(&AccountId::random(), &code)
        .await
        .expect_err("unknown");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn prepare_rejects_tags_held_by_live_pets(code: TagCode) {
    let tag = associated(Tag::unassociated(code.clone()));
    let holder = pet_for(AccountId::random());
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_code().return_once(move |_| Ok(Some(tag)));
    tags.expect_release_orphan().never();
    let mut pets = MockPetRepository::new();
    pets.expect_find_by_tag()
        .return_once(move |_| Ok(Some(holder)));

    let err = service(tags, pets)
        .prepare(&AccountId::random(), &code)
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "tag is already associated with an active pet");
}

#[rstest]
#[case(Ok(true))]
#[case(Err(TagRepositoryError::connection("reset failed")))]
#[tokio::test]
async fn prepare_resets_orphans_even_if_reset_fails(
    code: TagCode,
    #[case] reset: Result<bool, TagRepositoryError>,
) {
    let tag = associated(Tag::unassociated(code.clone()));
    let account = AccountId::random();
    let candidate = pet_for(account);
    let candidate_id = candidate.id;
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_code().return_once(move |_| Ok(Some(tag)));
    tags.expect_release_orphan()
        .times(1)
        .return_once(move |_| reset);
    let mut pets = MockPetRepository::new();
    pets.expect_find_by_tag().return_once(|_| Ok(None));
    pets.expect_list_untagged_for_owner()
        .return_once(move |_| Ok(vec![candidate]));

    let view = service(tags, pets)
        .prepare(&account, &code)
        .await
        .expect("orphan recovered");
    assert!(!view.tag.is_associated);
    assert_eq!(view.tag.owner, None);
    assert_eq!(
        view.candidates.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![candidate_id]
    );
}

#[rstest]
#[tokio::test]
async fn associate_new_pet_binds_placeholder(code: TagCode) {
    let tag = Tag::unassociated(code.clone());
    let tag_id = tag.id;
    let account = AccountId::random();
    let new_pet = PetId::random();
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_code().return_once(move |_| Ok(Some(tag)));
    tags.expect_bind()
        .withf(move |binding| {
            binding.tag_id == tag_id
                && binding.account == account
                && binding.associated_at == fixture_timestamp()
                && matches!(
                    &binding.target,
                    BindTarget::NewPet(draft) if draft.name() == PLACEHOLDER_PET_NAME
                )
        })
        .times(1)
        .return_once(move |_| Ok(new_pet));

    let outcome = service(tags, MockPetRepository::new())
        .associate(AssociateTagRequest {
            account,
            code,
            selection: PetSelection::CreateNew,
        })
        .await
        .expect("associated");
    assert_eq!(outcome.pet_id, new_pet);
    assert_eq!(outcome.next_step, NextStep::CompletePet);
}

#[rstest]
#[tokio::test]
async fn associate_existing_pet_goes_to_dashboard(code: TagCode) {
    let tag = Tag::unassociated(code.clone());
    let account = AccountId::random();
    let pet = pet_for(account);
    let pet_id = pet.id;
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_code().return_once(move |_| Ok(Some(tag)));
    tags.expect_bind()
        .withf(move |binding| binding.target == BindTarget::Existing(pet_id))
        .return_once(move |_| Ok(pet_id));
    let mut pets = MockPetRepository::new();
    pets.expect_find_for_owner()
        .return_once(move |_, _| Ok(Some(pet)));

    let outcome = service(tags, pets)
        .associate(AssociateTagRequest {
            account,
            code,
            selection: PetSelection::Existing(pet_id),
        })
        .await
        .expect("associated");
    assert_eq!(outcome.next_step, NextStep::Dashboard);
}

#[rstest]
#[tokio::test]
async fn associate_rejects_pet_that_already_has_a_tag(code: TagCode) {
    let tag = Tag::unassociated(code.clone());
    let account = AccountId::random();
    let mut pet = pet_for(account);
    pet.tag_id = Some(crate::domain::TagId::random());
    let pet_id = pet.id;
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_code().return_once(move |_| Ok(Some(tag)));
    tags.expect_bind().never();
    let mut pets = MockPetRepository::new();
    pets.expect_find_for_owner()
        .return_once(move |_, _| Ok(Some(pet)));

    let err = service(tags, pets)
        .associate(AssociateTagRequest {
            account,
            code,
            selection: PetSelection::Existing(pet_id),
        })
        .await
        .expect_err("already tagged");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn associate_maps_lost_race_to_conflict(code: TagCode) {
    let tag = Tag::unassociated(code.clone());
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_code().return_once(move |_| Ok(Some(tag)));
    tags.expect_bind()
        .return_once(|_| Err(TagRepositoryError::already_associated("QR000TEST")));

    let err = service(tags, MockPetRepository::new())
        .associate(AssociateTagRequest {
            account: AccountId::random(),
            code,
            selection: PetSelection::CreateNew,
        })
        .await
        .expect_err("race lost");
    assert_eq!(err.code(), ErrorCode::Conflict);
}
