use crate::{
    domain::{errors::VersionResult, models::RevisionRecord, value_objects::ObjectKey},
    ports::{
        files::{ExternalMountStorage, FileHandle, FileStorage},
        storage::ObjectVersionStore,
    },
    services::backend::{BackendResolver, S3VersionBackend},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Backend for files on externally mounted S3 buckets
pub type ExternalMountBackend = S3VersionBackend<ExternalMountResolver>;

pub fn external_mount_backend() -> ExternalMountBackend {
    S3VersionBackend::new(ExternalMountResolver)
}

/// Resolver for external mounts: content is addressed by the file's path
/// relative to the mount root, unwound through any path-remapping wrappers.
///
/// Accepts every storage (registered last in the dispatch order); files on
/// storages that do not bottom out at an S3 mount simply resolve to no
/// connection.
pub struct ExternalMountResolver;

impl ExternalMountResolver {
    fn resolve_mount(file: &FileHandle) -> Option<(&ExternalMountStorage, String)> {
        let (storage, path) = file.storage.resolve_path(&file.internal_path);
        match storage {
            FileStorage::ExternalMount(mount) => Some((mount, path)),
            _ => None,
        }
    }
}

#[async_trait]
impl BackendResolver for ExternalMountResolver {
    fn handles_storage(&self, _storage: &FileStorage) -> bool {
        true
    }

    fn connection(&self, file: &FileHandle) -> Option<Arc<dyn ObjectVersionStore>> {
        let (mount, _) = Self::resolve_mount(file)?;
        Some(Arc::clone(&mount.connection))
    }

    fn urn(&self, file: &FileHandle) -> Option<ObjectKey> {
        let (_, path) = Self::resolve_mount(file)?;
        ObjectKey::new(path).ok()
    }

    /// No cache write-through exists for mounts; trigger the change scanner
    /// on the file's path so the directory cache picks up the new size and
    /// etag on next access.
    async fn post_rollback(
        &self,
        file: &FileHandle,
        _revision: &RevisionRecord,
    ) -> VersionResult<()> {
        let Some((mount, path)) = Self::resolve_mount(file) else {
            return Ok(());
        };
        mount.scanner.scan(&path).await
    }
}
