//! Reverse geocoding adapters.
//!
//! [`OpenCageGeocoder`] resolves coordinates to a formatted street address.
//! [`DisabledGeocoder`] stands in when no API key is configured and always
//! reports "no address", which the scan flow treats as coordinates only.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use zeroize::Zeroizing;

use super::http_support::status_message;
use crate::domain::Coordinates;
use crate::domain::ports::{ReverseGeocoder, ReverseGeocoderError};

/// OpenCage forward/reverse geocoding endpoint.
pub const OPENCAGE_ENDPOINT: &str = "https://api.opencagedata.com/geocode/v1/json";
/// Request timeout for address lookups.
pub const GEOCODING_TIMEOUT: Duration = Duration::from_secs(10);
const RESULT_LANGUAGE: &str = "es";

#[derive(Debug, Deserialize)]
struct GeocodeResponseDto {
    #[serde(default)]
    results: Vec<GeocodeResultDto>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResultDto {
    formatted: Option<String>,
}

/// Reverse geocoder backed by the OpenCage HTTP API.
pub struct OpenCageGeocoder {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl OpenCageGeocoder {
    /// Build a geocoder with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: Zeroizing::new(api_key),
        })
    }

    fn lookup_url(&self, coordinates: Coordinates) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(
                "q",
                &format!("{},{}", coordinates.latitude(), coordinates.longitude()),
            )
            .append_pair("key", self.api_key.as_str())
            .append_pair("language", RESULT_LANGUAGE)
            .append_pair("no_annotations", "1");
        url
    }
}

#[async_trait]
impl ReverseGeocoder for OpenCageGeocoder {
    async fn lookup(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<String>, ReverseGeocoderError> {
        let response = self
            .client
            .get(self.lookup_url(coordinates))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_address(body.as_ref())
    }
}

/// Geocoder used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeocoder;

#[async_trait]
impl ReverseGeocoder for DisabledGeocoder {
    async fn lookup(
        &self,
        _coordinates: Coordinates,
    ) -> Result<Option<String>, ReverseGeocoderError> {
        Ok(None)
    }
}

fn parse_address(body: &[u8]) -> Result<Option<String>, ReverseGeocoderError> {
    let decoded: GeocodeResponseDto = serde_json::from_slice(body).map_err(|error| {
        ReverseGeocoderError::decode(format!("invalid OpenCage JSON payload: {error}"))
    })?;
    Ok(decoded
        .results
        .into_iter()
        .next()
        .and_then(|result| result.formatted)
        .map(|address| address.trim().to_owned())
        .filter(|address| !address.is_empty()))
}

fn map_transport_error(error: reqwest::Error) -> ReverseGeocoderError {
    ReverseGeocoderError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ReverseGeocoderError {
    let message = status_message(status, body);
    if status.is_client_error() {
        ReverseGeocoderError::rejected(message)
    } else {
        ReverseGeocoderError::transport(message)
    }
}
