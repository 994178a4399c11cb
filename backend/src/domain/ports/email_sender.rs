//! Port abstraction for the transactional email provider.

use async_trait::async_trait;

use crate::domain::OutboundEmail;

use super::define_port_error;

define_port_error! {
    /// Errors raised by email adapters.
    pub enum EmailSenderError {
        /// No provider credential is configured.
        NotConfigured => "email service not configured",
        /// The provider account may only send to restricted recipients.
        SandboxRestricted { message: String } => "email provider restricted recipient: {message}",
        /// The provider refused the message.
        Rejected { message: String } => "email provider rejected message: {message}",
        /// Network failure or timeout.
        Transport { message: String } => "email provider unreachable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send one email and return the provider's message id.
    async fn send(&self, email: &OutboundEmail) -> Result<String, EmailSenderError>;
}
