//! PostgreSQL-backed `PetRepository` implementation.
//!
//! Pet reads join `qr_codes` so callers see the printed code of a linked tag.
//! Creation writes default privacy settings in the same transaction, and
//! deletion releases the linked tag before the pet row disappears.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{PetRepository, PetRepositoryError};
use crate::domain::{AccountId, Pet, PetId, PrivacySettings, TagCode, TagId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_privacy_settings_repository::settings_to_row;
use super::models::{NewPetRow, PetRow, PetUpdate, TagAssociationUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{pets, privacy_settings, qr_codes};

/// Diesel-backed implementation of the pet repository port.
#[derive(Clone)]
pub struct DieselPetRepository {
    pool: DbPool,
}

impl DieselPetRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PetRepositoryError {
    map_basic_pool_error(error, PetRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> PetRepositoryError {
    map_basic_diesel_error(
        error,
        PetRepositoryError::query,
        PetRepositoryError::connection,
    )
}

fn row_to_pet((row, code): (PetRow, Option<String>)) -> Pet {
    let tag_code = code.and_then(|raw| match TagCode::new(&raw) {
        Ok(code) => Some(code),
        Err(error) => {
            warn!(pet = %row.id, %error, "ignoring invalid stored tag code");
            None
        }
    });
    Pet {
        id: PetId::from_uuid(row.id),
        owner: AccountId::from_uuid(row.user_id),
        name: row.name,
        breed: row.breed,
        age: row.age.and_then(|age| u16::try_from(age).ok()),
        photo_url: row.photo_url,
        vaccine_pdf_url: row.vaccine_pdf_url,
        tag_id: row.qr_code_id.map(TagId::from_uuid),
        tag_code,
        created_at: row.created_at,
    }
}

type PetWithCode = (PetRow, Option<String>);

#[async_trait]
impl PetRepository for DieselPetRepository {
    async fn list_for_owner(&self, owner: &AccountId) -> Result<Vec<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PetWithCode> = pets::table
            .left_join(qr_codes::table)
            .filter(pets::user_id.eq(owner.as_uuid()))
            .order(pets::created_at.desc())
            .select((PetRow::as_select(), qr_codes::qr_code.nullable()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_pet).collect())
    }

    async fn list_untagged_for_owner(
        &self,
        owner: &AccountId,
    ) -> Result<Vec<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PetRow> = pets::table
            .filter(pets::user_id.eq(owner.as_uuid()))
            .filter(pets::qr_code_id.is_null())
            .order(pets::created_at.desc())
            .select(PetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(|row| row_to_pet((row, None))).collect())
    }

    async fn find_for_owner(
        &self,
        owner: &AccountId,
        id: &PetId,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PetWithCode> = pets::table
            .left_join(qr_codes::table)
            .filter(pets::id.eq(id.as_uuid()))
            .filter(pets::user_id.eq(owner.as_uuid()))
            .select((PetRow::as_select(), qr_codes::qr_code.nullable()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_pet))
    }

    async fn find_by_tag(&self, tag_id: &TagId) -> Result<Option<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PetWithCode> = pets::table
            .left_join(qr_codes::table)
            .filter(pets::qr_code_id.eq(tag_id.as_uuid()))
            .select((PetRow::as_select(), qr_codes::qr_code.nullable()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_pet))
    }

    async fn create(&self, pet: &Pet) -> Result<(), PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPetRow {
            id: *pet.id.as_uuid(),
            user_id: *pet.owner.as_uuid(),
            name: &pet.name,
            breed: pet.breed.as_deref(),
            age: pet.age.map(i32::from),
            photo_url: pet.photo_url.as_deref(),
            vaccine_pdf_url: pet.vaccine_pdf_url.as_deref(),
            qr_code_id: pet.tag_id.map(|id| *id.as_uuid()),
            created_at: pet.created_at,
        };
        let privacy = settings_to_row(&PrivacySettings::defaults(pet.id));
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(pets::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(privacy_settings::table)
                    .values(&privacy)
                    .execute(conn)
                    .await?;
                Ok::<_, DieselError>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, pet: &Pet) -> Result<(), PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PetUpdate {
            name: &pet.name,
            breed: pet.breed.as_deref(),
            age: pet.age.map(i32::from),
            photo_url: pet.photo_url.as_deref(),
            vaccine_pdf_url: pet.vaccine_pdf_url.as_deref(),
        };
        let updated = diesel::update(
            pets::table
                .filter(pets::id.eq(pet.id.as_uuid()))
                .filter(pets::user_id.eq(pet.owner.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(PetRepositoryError::query("pet row vanished during update"));
        }
        Ok(())
    }

    async fn delete_releasing_tag(
        &self,
        owner: &AccountId,
        id: &PetId,
    ) -> Result<bool, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pet_id = *id.as_uuid();
        let owner_id = *owner.as_uuid();
        conn.transaction(|conn| {
            async move {
                let linked: Option<Option<Uuid>> = pets::table
                    .filter(pets::id.eq(pet_id))
                    .filter(pets::user_id.eq(owner_id))
                    .select(pets::qr_code_id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(tag_id) = linked else {
                    return Ok(false);
                };
                diesel::delete(pets::table.filter(pets::id.eq(pet_id)))
                    .execute(conn)
                    .await?;
                if let Some(tag_id) = tag_id {
                    diesel::update(qr_codes::table.filter(qr_codes::id.eq(tag_id)))
                        .set(&TagAssociationUpdate::released())
                        .execute(conn)
                        .await?;
                }
                Ok::<_, DieselError>(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row(age: Option<i32>) -> PetRow {
        PetRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Luna".to_owned(),
            breed: Some("Beagle".to_owned()),
            age,
            photo_url: None,
            vaccine_pdf_url: None,
            qr_code_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn joined_code_is_attached() {
        let pet = row_to_pet((row(Some(4)), Some("QR000TEST".to_owned())));
        assert_eq!(pet.tag_code.as_ref().map(AsRef::as_ref), Some("QR000TEST"));
        assert_eq!(pet.age, Some(4));
        assert!(pet.tag_id.is_some());
    }

    #[rstest]
    #[case(Some(-1))]
    #[case(Some(70_000))]
    fn out_of_range_ages_are_dropped(#[case] age: Option<i32>) {
        assert_eq!(row_to_pet((row(age), None)).age, None);
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(err, PetRepositoryError::Connection { .. }));
    }
}
