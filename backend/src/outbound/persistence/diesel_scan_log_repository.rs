//! PostgreSQL-backed append-only scan log.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ScanLogEntry;
use crate::domain::ports::{ScanLogRepository, ScanLogRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewScanLogRow;
use super::pool::{DbPool, PoolError};
use super::schema::scan_logs;

/// Diesel-backed implementation of the scan log port.
#[derive(Clone)]
pub struct DieselScanLogRepository {
    pool: DbPool,
}

impl DieselScanLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScanLogRepositoryError {
    map_basic_pool_error(error, ScanLogRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ScanLogRepositoryError {
    map_basic_diesel_error(
        error,
        ScanLogRepositoryError::query,
        ScanLogRepositoryError::connection,
    )
}

fn entry_to_row(entry: &ScanLogEntry) -> NewScanLogRow<'_> {
    let coordinates = entry.location.as_ref().map(|l| l.coordinates);
    NewScanLogRow {
        id: entry.id,
        qr_code_id: *entry.tag_id.as_uuid(),
        pet_id: entry.pet_id.map(|id| *id.as_uuid()),
        contact_method: entry.contact_method.as_str(),
        contact_info: &entry.contact_info,
        message: entry.message.as_deref(),
        latitude: coordinates.map(|c| c.latitude()),
        longitude: coordinates.map(|c| c.longitude()),
        location_address: entry.location.as_ref().and_then(|l| l.address.as_deref()),
        message_sent: entry.message_sent,
        created_at: entry.created_at,
    }
}

#[async_trait]
impl ScanLogRepository for DieselScanLogRepository {
    async fn append(&self, entry: &ScanLogEntry) -> Result<(), ScanLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(scan_logs::table)
            .values(&entry_to_row(entry))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactMethod, Coordinates, GeoLocation, TagId};
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn entry(location: Option<GeoLocation>) -> ScanLogEntry {
        ScanLogEntry {
            id: Uuid::new_v4(),
            tag_id: TagId::random(),
            pet_id: None,
            contact_method: ContactMethod::WhatsApp,
            contact_info: "+34 600 000 000".to_owned(),
            message: None,
            location,
            message_sent: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn declined_location_leaves_coordinates_null() {
        let entry = entry(None);
        let row = entry_to_row(&entry);
        assert_eq!(row.latitude, None);
        assert_eq!(row.longitude, None);
        assert_eq!(row.location_address, None);
        assert_eq!(row.contact_method, "whatsapp");
    }

    #[rstest]
    fn shared_location_fills_every_column() {
        let coordinates = Coordinates::new(40.4168, -3.7038).expect("coordinates");
        let entry = entry(Some(GeoLocation::new(
            coordinates,
            Some("Puerta del Sol, Madrid".to_owned()),
        )));
        let row = entry_to_row(&entry);
        assert_eq!(row.latitude, Some(40.4168));
        assert_eq!(row.longitude, Some(-3.7038));
        assert_eq!(row.location_address, Some("Puerta del Sol, Madrid"));
    }
}
