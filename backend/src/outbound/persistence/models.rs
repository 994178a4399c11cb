//! Internal Diesel row structs for database operations.
//!
//! These types stay inside the persistence layer. Repositories convert them
//! to domain types before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{pets, privacy_settings, profiles, qr_codes, scan_logs};

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Row struct for reading from the qr_codes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = qr_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: Uuid,
    pub qr_code: String,
    pub is_associated: bool,
    pub user_id: Option<Uuid>,
    pub associated_at: Option<DateTime<Utc>>,
}

/// Insertable struct for issuing a new tag.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = qr_codes)]
pub(crate) struct NewTagRow<'a> {
    pub id: Uuid,
    pub qr_code: &'a str,
    pub is_associated: bool,
}

/// Changeset applied when a tag changes hands.
///
/// `treat_none_as_null` lets a release clear the owner columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = qr_codes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TagAssociationUpdate {
    pub is_associated: bool,
    pub user_id: Option<Uuid>,
    pub associated_at: Option<DateTime<Utc>>,
}

impl TagAssociationUpdate {
    /// Changeset returning a tag to the unassociated pool.
    pub(crate) const fn released() -> Self {
        Self {
            is_associated: false,
            user_id: None,
            associated_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

/// Row struct for reading from the pets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub photo_url: Option<String>,
    pub vaccine_pdf_url: Option<String>,
    pub qr_code_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating pets.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pets)]
pub(crate) struct NewPetRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub breed: Option<&'a str>,
    pub age: Option<i32>,
    pub photo_url: Option<&'a str>,
    pub vaccine_pdf_url: Option<&'a str>,
    pub qr_code_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Changeset for owner edits. Tag linkage is managed separately.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pets)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PetUpdate<'a> {
    pub name: &'a str,
    pub breed: Option<&'a str>,
    pub age: Option<i32>,
    pub photo_url: Option<&'a str>,
    pub vaccine_pdf_url: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Privacy settings
// ---------------------------------------------------------------------------

/// Row struct for the privacy_settings table, used for reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = privacy_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PrivacySettingsRow {
    pub pet_id: Uuid,
    pub show_name: bool,
    pub show_email: bool,
    pub show_phone: bool,
    pub show_address: bool,
    pub custom_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Owner profiles
// ---------------------------------------------------------------------------

/// Row struct for reading from the profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Insertable struct for profile upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when an existing profile is overwritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileUpdate<'a> {
    pub email: &'a str,
    pub full_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Scan logs
// ---------------------------------------------------------------------------

/// Insertable struct for the append-only scan_logs table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scan_logs)]
pub(crate) struct NewScanLogRow<'a> {
    pub id: Uuid,
    pub qr_code_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub contact_method: &'a str,
    pub contact_info: &'a str,
    pub message: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_address: Option<&'a str>,
    pub message_sent: bool,
    pub created_at: DateTime<Utc>,
}
