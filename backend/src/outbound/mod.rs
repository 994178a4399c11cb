//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local store and identity provider used when no
//!   database or identity service is configured
//! - **supabase**: GoTrue identity and object storage
//! - **email**: Resend email sender
//! - **geocoding**: OpenCage reverse geocoder
//! - **qr**: QR artwork renderer
//!
//! Adapters translate between domain types and external representations.
//! They contain no business rules.

pub mod email;
pub mod geocoding;
mod http_support;
pub mod memory;
pub mod persistence;
pub mod qr;
pub mod supabase;
