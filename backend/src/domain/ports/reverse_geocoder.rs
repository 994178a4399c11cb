//! Port abstraction for reverse geocoding.

use async_trait::async_trait;

use crate::domain::Coordinates;

use super::define_port_error;

define_port_error! {
    /// Errors raised by reverse geocoding adapters.
    pub enum ReverseGeocoderError {
        /// The provider answered with an error status.
        Rejected { message: String } => "geocoder rejected lookup: {message}",
        /// Network failure or timeout.
        Transport { message: String } => "geocoder unreachable: {message}",
        /// The response body did not have the expected shape.
        Decode { message: String } => "geocoder response malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Human-readable address for `coordinates`, if the provider knows one.
    async fn lookup(&self, coordinates: Coordinates)
    -> Result<Option<String>, ReverseGeocoderError>;
}
