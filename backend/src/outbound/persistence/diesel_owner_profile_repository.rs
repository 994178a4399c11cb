//! PostgreSQL-backed `OwnerProfileRepository` implementation.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OwnerProfileRepository, OwnerProfileRepositoryError};
use crate::domain::{AccountId, EmailAddress, OwnerProfile};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewProfileRow, ProfileRow, ProfileUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the owner profile port.
#[derive(Clone)]
pub struct DieselOwnerProfileRepository {
    pool: DbPool,
}

impl DieselOwnerProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OwnerProfileRepositoryError {
    map_basic_pool_error(error, OwnerProfileRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OwnerProfileRepositoryError {
    map_basic_diesel_error(
        error,
        OwnerProfileRepositoryError::query,
        OwnerProfileRepositoryError::connection,
    )
}

fn row_to_profile(row: ProfileRow) -> Result<OwnerProfile, OwnerProfileRepositoryError> {
    let email = EmailAddress::new(&row.email).map_err(|err| {
        OwnerProfileRepositoryError::query(format!("stored profile email is invalid: {err}"))
    })?;
    Ok(OwnerProfile {
        account_id: AccountId::from_uuid(row.id),
        email,
        full_name: row.full_name,
        phone: row.phone,
        address: row.address,
    })
}

#[async_trait]
impl OwnerProfileRepository for DieselOwnerProfileRepository {
    async fn find(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<OwnerProfile>, OwnerProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfileRow> = profiles::table
            .filter(profiles::id.eq(account_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_profile).transpose()
    }

    async fn upsert(&self, profile: &OwnerProfile) -> Result<(), OwnerProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();
        let insert = NewProfileRow {
            id: *profile.account_id.as_uuid(),
            email: profile.email.as_ref(),
            full_name: profile.full_name.as_deref(),
            phone: profile.phone.as_deref(),
            address: profile.address.as_deref(),
            updated_at: now,
        };
        let update = ProfileUpdate {
            email: profile.email.as_ref(),
            full_name: profile.full_name.as_deref(),
            phone: profile.phone.as_deref(),
            address: profile.address.as_deref(),
            updated_at: now,
        };
        diesel::insert_into(profiles::table)
            .values(&insert)
            .on_conflict(profiles::id)
            .do_update()
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(email: &str) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            full_name: Some("Ana Owner".to_owned()),
            phone: None,
            address: Some("Calle Mayor 1".to_owned()),
        }
    }

    #[rstest]
    fn rows_convert_to_profiles() {
        let profile = row_to_profile(row("ana@example.com")).expect("valid row");
        assert_eq!(profile.email.as_ref(), "ana@example.com");
        assert_eq!(profile.full_name.as_deref(), Some("Ana Owner"));
        assert_eq!(profile.phone, None);
    }

    #[rstest]
    fn corrupt_emails_surface_as_query_errors() {
        let err = row_to_profile(row("not-an-email")).expect_err("invalid email");
        assert!(matches!(err, OwnerProfileRepositoryError::Query { .. }));
    }
}
