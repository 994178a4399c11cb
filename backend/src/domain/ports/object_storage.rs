//! Port abstraction for removing uploaded pet files.

use async_trait::async_trait;

use crate::domain::StoredObject;

use super::define_port_error;

define_port_error! {
    /// Errors raised by object storage adapters.
    pub enum ObjectStorageError {
        /// The storage API refused the removal.
        Rejected { message: String } => "object storage rejected removal: {message}",
        /// Network failure or timeout.
        Transport { message: String } => "object storage unreachable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Remove one object. Missing objects are not an error.
    async fn remove(&self, object: &StoredObject) -> Result<(), ObjectStorageError>;
}
