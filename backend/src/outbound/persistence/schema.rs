//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep these in step with the SQL migrations; `diesel print-schema` against
//! a migrated database regenerates them.

diesel::table! {
    /// Owner contact details keyed by identity-provider account id.
    profiles (id) {
        id -> Uuid,
        email -> Text,
        full_name -> Nullable<Text>,
        phone -> Nullable<Text>,
        address -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Printed QR tags.
    qr_codes (id) {
        id -> Uuid,
        /// Unique printed code.
        qr_code -> Varchar,
        is_associated -> Bool,
        /// Claiming account, null while unassociated.
        user_id -> Nullable<Uuid>,
        associated_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Owner pets; `qr_code_id` is unique so a tag serves one pet at most.
    pets (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Text,
        breed -> Nullable<Text>,
        age -> Nullable<Int4>,
        photo_url -> Nullable<Text>,
        vaccine_pdf_url -> Nullable<Text>,
        qr_code_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per pet, removed with the pet.
    privacy_settings (pet_id) {
        pet_id -> Uuid,
        show_name -> Bool,
        show_email -> Bool,
        show_phone -> Bool,
        show_address -> Bool,
        custom_message -> Nullable<Text>,
    }
}

diesel::table! {
    /// Append-only finder submissions.
    scan_logs (id) {
        id -> Uuid,
        qr_code_id -> Uuid,
        pet_id -> Nullable<Uuid>,
        contact_method -> Text,
        contact_info -> Text,
        message -> Nullable<Text>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        location_address -> Nullable<Text>,
        message_sent -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(pets -> qr_codes (qr_code_id));
diesel::joinable!(privacy_settings -> pets (pet_id));
diesel::joinable!(scan_logs -> qr_codes (qr_code_id));

diesel::allow_tables_to_appear_in_same_query!(profiles, qr_codes, pets, privacy_settings, scan_logs);
