//! PostgreSQL-backed `TagRepository` implementation.
//!
//! Binding runs in one transaction: the tag row is locked, the pet is created
//! or checked, the pet is linked and the tag is flagged. Any failure rolls the
//! whole binding back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{BindTarget, TagBinding, TagRepository, TagRepositoryError};
use crate::domain::{AccountId, PetDraft, PetId, PrivacySettings, Tag, TagCode, TagId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewPetRow, NewTagRow, TagAssociationUpdate, TagRow};
use super::pool::{DbPool, PoolError};
use super::diesel_privacy_settings_repository::settings_to_row;
use super::schema::{pets, privacy_settings, qr_codes};

/// Diesel-backed implementation of the tag repository port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TagRepositoryError {
    map_basic_pool_error(error, TagRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> TagRepositoryError {
    map_basic_diesel_error(
        error,
        TagRepositoryError::query,
        TagRepositoryError::connection,
    )
}

fn row_to_tag(row: TagRow) -> Result<Tag, TagRepositoryError> {
    let code = TagCode::new(&row.qr_code)
        .map_err(|err| TagRepositoryError::query(format!("stored tag code is invalid: {err}")))?;
    Ok(Tag {
        id: TagId::from_uuid(row.id),
        code,
        is_associated: row.is_associated,
        owner: row.user_id.map(AccountId::from_uuid),
        associated_at: row.associated_at,
    })
}

/// Failure inside the binding transaction.
///
/// Diesel needs `From<diesel::result::Error>` on the transaction error type,
/// so domain refusals travel alongside raw database errors.
#[derive(Debug)]
enum BindError {
    Database(DieselError),
    AlreadyAssociated(String),
    PetUnavailable,
}

impl From<DieselError> for BindError {
    fn from(error: DieselError) -> Self {
        Self::Database(error)
    }
}

async fn insert_new_pet<C>(
    conn: &mut C,
    binding: &TagBinding,
    draft: &PetDraft,
) -> Result<Uuid, BindError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let pet_id = PetId::random();
    diesel::insert_into(pets::table)
        .values(&NewPetRow {
            id: *pet_id.as_uuid(),
            user_id: *binding.account.as_uuid(),
            name: draft.name(),
            breed: draft.breed(),
            age: draft.age().map(i32::from),
            photo_url: draft.photo_url(),
            vaccine_pdf_url: draft.vaccine_pdf_url(),
            qr_code_id: None,
            created_at: binding.associated_at,
        })
        .execute(conn)
        .await?;
    diesel::insert_into(privacy_settings::table)
        .values(&settings_to_row(&PrivacySettings::defaults(pet_id)))
        .execute(conn)
        .await?;
    Ok(*pet_id.as_uuid())
}

async fn bind_in_transaction<C>(conn: &mut C, binding: &TagBinding) -> Result<Uuid, BindError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let tag_id = *binding.tag_id.as_uuid();
    let owner = *binding.account.as_uuid();

    let (code, is_associated): (String, bool) = qr_codes::table
        .filter(qr_codes::id.eq(tag_id))
        .select((qr_codes::qr_code, qr_codes::is_associated))
        .for_update()
        .first(conn)
        .await?;
    if is_associated {
        return Err(BindError::AlreadyAssociated(code));
    }

    let pet_id = match &binding.target {
        BindTarget::NewPet(draft) => insert_new_pet(conn, binding, draft).await?,
        BindTarget::Existing(pet_id) => {
            let claimable: Option<Uuid> = pets::table
                .filter(pets::id.eq(pet_id.as_uuid()))
                .filter(pets::user_id.eq(owner))
                .filter(pets::qr_code_id.is_null())
                .select(pets::id)
                .for_update()
                .first(conn)
                .await
                .optional()?;
            claimable.ok_or(BindError::PetUnavailable)?
        }
    };

    diesel::update(pets::table.filter(pets::id.eq(pet_id)))
        .set(pets::qr_code_id.eq(Some(tag_id)))
        .execute(conn)
        .await?;
    diesel::update(qr_codes::table.filter(qr_codes::id.eq(tag_id)))
        .set(&TagAssociationUpdate {
            is_associated: true,
            user_id: Some(owner),
            associated_at: Some(binding.associated_at),
        })
        .execute(conn)
        .await?;
    Ok(pet_id)
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn find_by_code(&self, code: &TagCode) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = qr_codes::table
            .filter(qr_codes::qr_code.eq(code.as_ref()))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_tag).transpose()
    }

    async fn insert(&self, tag: &Tag) -> Result<(), TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(qr_codes::table)
            .values(&NewTagRow {
                id: *tag.id.as_uuid(),
                qr_code: tag.code.as_ref(),
                is_associated: tag.is_associated,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| {
                if is_unique_violation(&error) {
                    TagRepositoryError::duplicate_code(tag.code.as_ref())
                } else {
                    map_diesel_error(error)
                }
            })
    }

    async fn release_orphan(&self, tag_id: &TagId) -> Result<bool, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let holders = pets::table
            .filter(pets::qr_code_id.eq(tag_id.as_uuid()))
            .select(pets::id);
        let updated = diesel::update(
            qr_codes::table
                .filter(qr_codes::id.eq(tag_id.as_uuid()))
                .filter(diesel::dsl::not(diesel::dsl::exists(holders))),
        )
        .set(&TagAssociationUpdate::released())
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        debug!(tag = %tag_id, released = updated > 0, "orphan release attempted");
        Ok(updated > 0)
    }

    async fn bind(&self, binding: TagBinding) -> Result<PetId, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let outcome = conn
            .transaction(|conn| {
                async move { bind_in_transaction(conn, &binding).await }.scope_boxed()
            })
            .await;
        match outcome {
            Ok(pet_id) => Ok(PetId::from_uuid(pet_id)),
            Err(BindError::AlreadyAssociated(code)) => {
                Err(TagRepositoryError::already_associated(code))
            }
            Err(BindError::PetUnavailable) => Err(TagRepositoryError::pet_unavailable()),
            Err(BindError::Database(error)) if is_unique_violation(&error) => {
                Err(TagRepositoryError::pet_unavailable())
            }
            Err(BindError::Database(error)) => Err(map_diesel_error(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(code: &str) -> TagRow {
        TagRow {
            id: Uuid::new_v4(),
            qr_code: code.to_owned(),
            is_associated: true,
            user_id: Some(Uuid::new_v4()),
            associated_at: None,
        }
    }

    #[rstest]
    fn rows_convert_to_tags() {
        let source = row("QR000TEST");
        let owner = source.user_id;
        let tag = row_to_tag(source).expect("valid row");
        assert_eq!(tag.code.as_ref(), "QR000TEST");
        assert!(tag.is_associated);
        assert_eq!(tag.owner.map(|o| *o.as_uuid()), owner);
    }

    #[rstest]
    fn corrupt_codes_surface_as_query_errors() {
        let err = row_to_tag(row("   ")).expect_err("blank code");
        assert!(matches!(err, TagRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_pool_error(PoolError::checkout("refused"));
        assert!(matches!(err, TagRepositoryError::Connection { .. }));
    }
}
