//! Resend-backed email sender.
//!
//! A sender built without an API key stays in the graph and answers every
//! send with `NotConfigured`, so the dispatcher can report the missing
//! credential instead of failing at startup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::http_support::status_message;
use crate::domain::OutboundEmail;
use crate::domain::ports::{EmailSender, EmailSenderError};

/// Resend API endpoint for sending a single email.
pub const RESEND_EMAILS_ENDPOINT: &str = "https://api.resend.com/emails";
/// Sender used when none is configured.
pub const DEFAULT_FROM_ADDRESS: &str = "Tag Pet <onboarding@resend.dev>";
/// Request timeout for email delivery.
pub const EMAIL_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct SendEmailDto<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponseDto {
    id: String,
}

/// Email sender speaking the Resend HTTP API.
pub struct ResendEmailSender {
    client: Client,
    endpoint: Url,
    api_key: Option<Zeroizing<String>>,
    from: String,
}

impl ResendEmailSender {
    /// Build a sender. `api_key = None` yields a sender that is not configured.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        from: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key
                .filter(|key| !key.trim().is_empty())
                .map(Zeroizing::new),
            from: from
                .filter(|from| !from.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_owned()),
        })
    }

    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<String, EmailSenderError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(EmailSenderError::not_configured());
        };
        let payload = SendEmailDto {
            from: &self.from,
            to: [email.to.as_ref()],
            subject: &email.subject,
            html: &email.html,
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_message_id(body.as_ref())
    }
}

fn parse_message_id(body: &[u8]) -> Result<String, EmailSenderError> {
    serde_json::from_slice::<SendEmailResponseDto>(body)
        .map(|dto| dto.id)
        .map_err(|error| EmailSenderError::transport(format!("invalid Resend response: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> EmailSenderError {
    EmailSenderError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> EmailSenderError {
    let message = status_message(status, body);
    match status {
        StatusCode::FORBIDDEN => EmailSenderError::sandbox_restricted(message),
        _ if status.is_client_error() => EmailSenderError::rejected(message),
        _ => EmailSenderError::transport(message),
    }
}
