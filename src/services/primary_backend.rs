use crate::{
    domain::{
        errors::VersionResult,
        models::RevisionRecord,
        value_objects::ObjectKey,
    },
    ports::{
        files::{CacheUpdate, FileHandle, FileStorage},
        storage::ObjectVersionStore,
    },
    services::backend::{BackendResolver, S3VersionBackend},
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Backend for files in the service's own object-store-backed primary
/// storage
pub type PrimaryStorageBackend = S3VersionBackend<PrimaryStorageResolver>;

pub fn primary_storage_backend() -> PrimaryStorageBackend {
    S3VersionBackend::new(PrimaryStorageResolver)
}

/// Resolver for primary storage: content is addressed by a URN derived from
/// the file id, so renames and moves never change the key.
pub struct PrimaryStorageResolver;

#[async_trait]
impl BackendResolver for PrimaryStorageResolver {
    fn handles_storage(&self, storage: &FileStorage) -> bool {
        matches!(storage, FileStorage::Primary(_))
    }

    fn connection(&self, file: &FileHandle) -> Option<Arc<dyn ObjectVersionStore>> {
        match file.storage.as_ref() {
            FileStorage::Primary(primary) => Some(Arc::clone(&primary.connection)),
            _ => None,
        }
    }

    fn urn(&self, file: &FileHandle) -> Option<ObjectKey> {
        file.storage.urn_for(file.id)
    }

    /// The service's metadata cache is not object-store-aware; push the
    /// restored size and a fresh etag so it stops serving stale values.
    async fn post_rollback(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
    ) -> VersionResult<()> {
        let FileStorage::Primary(primary) = file.storage.as_ref() else {
            return Ok(());
        };
        primary
            .cache
            .update(
                file.id,
                CacheUpdate {
                    mtime: Utc::now().timestamp(),
                    size: revision.size,
                    etag: Uuid::new_v4().simple().to_string(),
                },
            )
            .await
    }
}
