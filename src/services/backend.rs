use crate::{
    domain::{
        errors::{VersionError, VersionResult},
        models::{Permissions, RevisionRecord, LABEL_KEY},
        value_objects::{ObjectKey, VersionId},
    },
    ports::{
        files::{FileHandle, FileStorage},
        storage::{ObjectVersionStore, VersionStream},
    },
    services::{RevisionFile, VersionProvider},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Per-backend revision-history contract exposed to the dispatcher.
///
/// Every operation follows resolve-then-delegate: files whose storage does
/// not resolve to an object store get an empty history and no-op mutations,
/// never an error.
#[async_trait]
pub trait VersionBackend: Send + Sync + 'static {
    /// Whether this backend owns files on the given storage; decided from
    /// the storage alone, without probing the file
    fn handles_storage(&self, storage: &FileStorage) -> bool;

    /// Historical revisions of the file, newest first; empty when the file
    /// is not object-store-backed
    async fn versions_for_file(&self, file: &FileHandle) -> VersionResult<Vec<RevisionRecord>>;

    /// Restore a revision as the current content; `false` when the file is
    /// not object-store-backed
    async fn rollback(&self, file: &FileHandle, revision: &RevisionRecord)
        -> VersionResult<bool>;

    /// Stream one revision's content
    async fn read(&self, file: &FileHandle, revision_id: &VersionId)
        -> VersionResult<VersionStream>;

    /// Read-only file view of one revision
    fn version_file(&self, file: &FileHandle, revision_id: &VersionId)
        -> VersionResult<RevisionFile>;

    /// Set or clear (empty string) the user-facing label of a revision
    async fn set_version_label(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
        label: &str,
    ) -> VersionResult<()>;

    /// Set or clear one metadata value on the revision with the given
    /// timestamp
    async fn set_metadata_value(
        &self,
        file: &FileHandle,
        timestamp: i64,
        key: &str,
        value: &str,
    ) -> VersionResult<()>;

    /// Permanently delete a revision
    async fn delete_version(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
    ) -> VersionResult<()>;
}

/// Resolution seam between a storage implementation and the provider:
/// which storages a backend owns, how a file maps to (connection, key),
/// and what to do right after a successful rollback.
#[async_trait]
pub trait BackendResolver: Send + Sync + 'static {
    fn handles_storage(&self, storage: &FileStorage) -> bool;

    /// Connection holding the file's content, `None` when the file is not
    /// object-store-backed
    fn connection(&self, file: &FileHandle) -> Option<Arc<dyn ObjectVersionStore>>;

    /// Stable key identifying the file's content in that store
    fn urn(&self, file: &FileHandle) -> Option<ObjectKey>;

    /// Backend-specific side effect, invoked exactly once immediately after
    /// a successful provider-level rollback
    async fn post_rollback(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
    ) -> VersionResult<()>;
}

/// Generic backend implementation: permission checks and resolve-then-
/// delegate flows shared by all resolvers.
pub struct S3VersionBackend<R: BackendResolver> {
    provider: VersionProvider,
    resolver: R,
}

impl<R: BackendResolver> S3VersionBackend<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            provider: VersionProvider::new(),
            resolver,
        }
    }

    fn resolve(&self, file: &FileHandle) -> Option<(Arc<dyn ObjectVersionStore>, ObjectKey)> {
        let connection = self.resolver.connection(file)?;
        let urn = self.resolver.urn(file)?;
        Some((connection, urn))
    }

    fn require_permission(
        file: &FileHandle,
        needed: Permissions,
        operation: &str,
        missing: &str,
    ) -> VersionResult<()> {
        if file.permissions.contains(needed) {
            Ok(())
        } else {
            Err(VersionError::PermissionDenied {
                operation: operation.to_string(),
                reason: format!("missing {} permission on '{}'", missing, file.name),
            })
        }
    }
}

#[async_trait]
impl<R: BackendResolver> VersionBackend for S3VersionBackend<R> {
    fn handles_storage(&self, storage: &FileStorage) -> bool {
        self.resolver.handles_storage(storage)
    }

    async fn versions_for_file(&self, file: &FileHandle) -> VersionResult<Vec<RevisionRecord>> {
        match self.resolve(file) {
            Some((store, urn)) => self.provider.get_versions(&store, &urn, file).await,
            None => Ok(Vec::new()),
        }
    }

    async fn rollback(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
    ) -> VersionResult<bool> {
        Self::require_permission(file, Permissions::UPDATE, "restore", "update")?;

        let Some((store, urn)) = self.resolve(file) else {
            return Ok(false);
        };
        self.provider
            .rollback(&store, &urn, &revision.revision_id)
            .await?;
        self.resolver.post_rollback(file, revision).await?;
        Ok(true)
    }

    async fn read(
        &self,
        file: &FileHandle,
        revision_id: &VersionId,
    ) -> VersionResult<VersionStream> {
        let Some((store, urn)) = self.resolve(file) else {
            return Err(VersionError::NotFound {
                key: file.internal_path.clone(),
                version_id: revision_id.as_str().to_string(),
            });
        };
        self.provider.read(&store, &urn, revision_id).await
    }

    fn version_file(
        &self,
        file: &FileHandle,
        revision_id: &VersionId,
    ) -> VersionResult<RevisionFile> {
        let Some((store, urn)) = self.resolve(file) else {
            return Err(VersionError::Provider {
                message: format!("file '{}' is not held in an object store", file.name),
                source: None,
            });
        };
        Ok(RevisionFile::new(
            file.clone(),
            store,
            urn,
            revision_id.clone(),
        ))
    }

    async fn set_version_label(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
        label: &str,
    ) -> VersionResult<()> {
        Self::require_permission(file, Permissions::UPDATE, "label", "update")?;

        let Some((store, urn)) = self.resolve(file) else {
            return Ok(());
        };
        self.provider
            .set_version_metadata(&store, &urn, &revision.revision_id, LABEL_KEY, label)
            .await
    }

    async fn set_metadata_value(
        &self,
        file: &FileHandle,
        timestamp: i64,
        key: &str,
        value: &str,
    ) -> VersionResult<()> {
        Self::require_permission(file, Permissions::UPDATE, "set metadata", "update")?;

        let revisions = self.versions_for_file(file).await?;
        let Some(revision) = revisions.into_iter().find(|r| r.timestamp == timestamp) else {
            return Ok(());
        };
        let Some((store, urn)) = self.resolve(file) else {
            return Ok(());
        };
        self.provider
            .set_version_metadata(&store, &urn, &revision.revision_id, key, value)
            .await
    }

    async fn delete_version(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
    ) -> VersionResult<()> {
        Self::require_permission(file, Permissions::DELETE, "delete version", "delete")?;

        let Some((store, urn)) = self.resolve(file) else {
            return Ok(());
        };
        self.provider
            .delete_version(&store, &urn, &revision.revision_id)
            .await
    }
}
