//! PostgreSQL-backed `PrivacySettingsRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PrivacySettingsRepository, PrivacySettingsRepositoryError};
use crate::domain::{PetId, PrivacySettings};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::PrivacySettingsRow;
use super::pool::{DbPool, PoolError};
use super::schema::privacy_settings;

/// Diesel-backed implementation of the privacy settings port.
#[derive(Clone)]
pub struct DieselPrivacySettingsRepository {
    pool: DbPool,
}

impl DieselPrivacySettingsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PrivacySettingsRepositoryError {
    map_basic_pool_error(error, PrivacySettingsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PrivacySettingsRepositoryError {
    map_basic_diesel_error(
        error,
        PrivacySettingsRepositoryError::query,
        PrivacySettingsRepositoryError::connection,
    )
}

pub(crate) fn settings_to_row(settings: &PrivacySettings) -> PrivacySettingsRow {
    PrivacySettingsRow {
        pet_id: *settings.pet_id.as_uuid(),
        show_name: settings.show_name,
        show_email: settings.show_email,
        show_phone: settings.show_phone,
        show_address: settings.show_address,
        custom_message: settings.custom_message.clone(),
    }
}

fn row_to_settings(row: PrivacySettingsRow) -> PrivacySettings {
    PrivacySettings {
        pet_id: PetId::from_uuid(row.pet_id),
        show_name: row.show_name,
        show_email: row.show_email,
        show_phone: row.show_phone,
        show_address: row.show_address,
        custom_message: row.custom_message,
    }
}

#[async_trait]
impl PrivacySettingsRepository for DieselPrivacySettingsRepository {
    async fn find_by_pet(
        &self,
        pet_id: &PetId,
    ) -> Result<Option<PrivacySettings>, PrivacySettingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PrivacySettingsRow> = privacy_settings::table
            .filter(privacy_settings::pet_id.eq(pet_id.as_uuid()))
            .select(PrivacySettingsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_settings))
    }

    async fn upsert(&self, settings: &PrivacySettings) -> Result<(), PrivacySettingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(privacy_settings::table)
            .values(&settings_to_row(settings))
            .on_conflict(privacy_settings::pet_id)
            .do_update()
            .set((
                privacy_settings::show_name.eq(excluded(privacy_settings::show_name)),
                privacy_settings::show_email.eq(excluded(privacy_settings::show_email)),
                privacy_settings::show_phone.eq(excluded(privacy_settings::show_phone)),
                privacy_settings::show_address.eq(excluded(privacy_settings::show_address)),
                privacy_settings::custom_message.eq(excluded(privacy_settings::custom_message)),
            ))
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

    #[rstest]
    fn rows_round_trip_every_flag() {
        let mut settings = PrivacySettings::defaults(PetId::random());
        settings.show_phone = false;
        settings.custom_message = Some("Reward offered".to_owned());

        assert_eq!(row_to_settings(settings_to_row(&settings)), settings);
    }

    #[rstest]
    fn diesel_not_found_is_a_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, PrivacySettingsRepositoryError::Query { .. }));
    }
}
