//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories here implement the domain's driven ports on top of
//! `diesel-async` with a `bb8` pool. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private; adapters convert to domain types
//! and map every database failure to the port's error enum.
//!
//! ```no_run
//! # async fn demo() -> Result<(), tagpet::outbound::persistence::PoolError> {
//! use tagpet::outbound::persistence::{DbPool, DieselTagRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tagpet")).await?;
//! let tags = DieselTagRepository::new(pool);
//! # let _ = tags;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_owner_profile_repository;
mod diesel_pet_repository;
mod diesel_privacy_settings_repository;
mod diesel_scan_log_repository;
mod diesel_tag_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_owner_profile_repository::DieselOwnerProfileRepository;
pub use diesel_pet_repository::DieselPetRepository;
pub use diesel_privacy_settings_repository::DieselPrivacySettingsRepository;
pub use diesel_scan_log_repository::DieselScanLogRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
