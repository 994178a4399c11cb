//! Supabase Storage removal adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use super::SupabaseProject;
use crate::domain::StoredObject;
use crate::domain::ports::{ObjectStorage, ObjectStorageError};
use crate::outbound::http_support::status_message;

#[derive(Serialize)]
struct RemoveObjectsDto<'a> {
    prefixes: [&'a str; 1],
}

/// Object storage adapter removing files from Supabase buckets.
pub struct SupabaseObjectStorage {
    client: Client,
    project: SupabaseProject,
}

impl SupabaseObjectStorage {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(project: SupabaseProject, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, project })
    }
}

fn removal_path(object: &StoredObject) -> String {
    format!("storage/v1/object/{}", object.bucket)
}

#[async_trait]
impl ObjectStorage for SupabaseObjectStorage {
    async fn remove(&self, object: &StoredObject) -> Result<(), ObjectStorageError> {
        let url = self
            .project
            .endpoint(&removal_path(object))
            .map_err(|err| ObjectStorageError::transport(err.to_string()))?;
        let response = self
            .client
            .delete(url)
            .header("apikey", self.project.api_key())
            .bearer_auth(self.project.api_key())
            .json(&RemoveObjectsDto {
                prefixes: [object.path.as_str()],
            })
            .send()
            .await
            .map_err(|err| ObjectStorageError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ObjectStorageError::transport(err.to_string()))?;
        map_status(status, body.as_ref())
    }
}

fn map_status(status: StatusCode, body: &[u8]) -> Result<(), ObjectStorageError> {
    if status.is_success() {
        return Ok(());
    }
    let message = status_message(status, body);
    if status.is_client_error() {
        Err(ObjectStorageError::rejected(message))
    } else {
        Err(ObjectStorageError::transport(message))
    }
}

/// Storage used when no provider is configured; removals are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledObjectStorage;

#[async_trait]
impl ObjectStorage for DisabledObjectStorage {
    async fn remove(&self, object: &StoredObject) -> Result<(), ObjectStorageError> {
        debug!(bucket = object.bucket, path = %object.path, "object storage disabled; skipping removal");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PET_PHOTOS_BUCKET;
    use rstest::rstest;

    #[rstest]
    fn removal_targets_the_bucket_endpoint() {
        let object = StoredObject {
            bucket: PET_PHOTOS_BUCKET,
            path: "owner/luna.jpg".to_owned(),
        };
        assert_eq!(removal_path(&object), "storage/v1/object/pet-photos");
    }

    #[rstest]
    #[case(StatusCode::OK, None)]
    #[case(StatusCode::NOT_FOUND, Some(true))]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, Some(false))]
    fn statuses_map_to_storage_errors(#[case] status: StatusCode, #[case] rejected: Option<bool>) {
        let outcome = map_status(status, b"{}");
        assert_eq!(
            outcome
                .err()
                .map(|err| matches!(err, ObjectStorageError::Rejected { .. })),
            rejected
        );
    }
}
