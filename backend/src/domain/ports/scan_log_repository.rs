//! Port abstraction for the append-only scan log.

use async_trait::async_trait;

use crate::domain::ScanLogEntry;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by scan log adapters.
    pub enum ScanLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "scan log connection failed: {message}",
        /// Insert failed during execution.
        Query { message: String } => "scan log insert failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanLogRepository: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: &ScanLogEntry) -> Result<(), ScanLogRepositoryError>;
}
