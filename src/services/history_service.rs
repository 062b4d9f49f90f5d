use crate::{
    domain::{
        errors::{VersionError, VersionResult},
        models::RevisionRecord,
        value_objects::VersionId,
    },
    ports::{
        files::{FileHandle, FileStorage},
        storage::VersionStream,
    },
    services::{backend::VersionBackend, RevisionFile},
};
use std::sync::Arc;
use tracing::debug;

/// The revision-history capability: dispatches each file to the backend
/// owning its storage.
///
/// Backends are probed in registration order; files whose storage no
/// backend resolves get an empty history and no-op mutations.
pub struct RevisionHistoryService {
    backends: Vec<Arc<dyn VersionBackend>>,
}

impl RevisionHistoryService {
    pub fn new(backends: Vec<Arc<dyn VersionBackend>>) -> Self {
        Self { backends }
    }

    fn backend_for(&self, storage: &FileStorage) -> Option<&Arc<dyn VersionBackend>> {
        self.backends
            .iter()
            .find(|backend| backend.handles_storage(storage))
    }

    /// Historical revisions of the file, newest first
    pub async fn list_revisions(&self, file: &FileHandle) -> VersionResult<Vec<RevisionRecord>> {
        match self.backend_for(&file.storage) {
            Some(backend) => backend.versions_for_file(file).await,
            None => {
                debug!(file = %file.name, "no version backend for storage");
                Ok(Vec::new())
            }
        }
    }

    /// Restore a revision as the current content; `false` when the file has
    /// no object-store-backed history
    pub async fn restore(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
    ) -> VersionResult<bool> {
        match self.backend_for(&file.storage) {
            Some(backend) => backend.rollback(file, revision).await,
            None => Ok(false),
        }
    }

    /// Stream one revision's content
    pub async fn read_revision(
        &self,
        file: &FileHandle,
        revision_id: &VersionId,
    ) -> VersionResult<VersionStream> {
        match self.backend_for(&file.storage) {
            Some(backend) => backend.read(file, revision_id).await,
            None => Err(VersionError::NotFound {
                key: file.internal_path.clone(),
                version_id: revision_id.as_str().to_string(),
            }),
        }
    }

    /// Read-only file view of one revision
    pub fn revision_file(
        &self,
        file: &FileHandle,
        revision_id: &VersionId,
    ) -> VersionResult<RevisionFile> {
        match self.backend_for(&file.storage) {
            Some(backend) => backend.version_file(file, revision_id),
            None => Err(VersionError::Provider {
                message: format!("file '{}' is not held in an object store", file.name),
                source: None,
            }),
        }
    }

    /// Set or clear (empty string) the user-facing label of a revision
    pub async fn set_label(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
        label: &str,
    ) -> VersionResult<()> {
        match self.backend_for(&file.storage) {
            Some(backend) => backend.set_version_label(file, revision, label).await,
            None => Ok(()),
        }
    }

    /// Set or clear one metadata value on the revision with the given
    /// timestamp
    pub async fn set_metadata(
        &self,
        file: &FileHandle,
        timestamp: i64,
        key: &str,
        value: &str,
    ) -> VersionResult<()> {
        match self.backend_for(&file.storage) {
            Some(backend) => backend.set_metadata_value(file, timestamp, key, value).await,
            None => Ok(()),
        }
    }

    /// Permanently delete a revision
    pub async fn delete_revision(
        &self,
        file: &FileHandle,
        revision: &RevisionRecord,
    ) -> VersionResult<()> {
        match self.backend_for(&file.storage) {
            Some(backend) => backend.delete_version(file, revision).await,
            None => Ok(()),
        }
    }
}
