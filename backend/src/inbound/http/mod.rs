//! HTTP inbound adapter exposing REST endpoints.

pub mod associate;
pub mod auth;
pub(crate) mod cache_control;
pub mod error;
pub mod health;
pub mod pets;
pub mod privacy;
pub mod profile;
pub mod scan;
pub mod schemas;
pub mod send_email;
pub mod session;
pub mod session_config;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
