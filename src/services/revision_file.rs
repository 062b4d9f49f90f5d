use crate::{
    domain::{
        errors::{VersionError, VersionResult},
        value_objects::{ObjectKey, VersionId},
    },
    ports::{
        files::FileHandle,
        storage::{ObjectVersionStore, VersionStream},
    },
    services::VersionProvider,
};
use bytes::Bytes;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Read-only file view of one historical revision.
///
/// Content is fetched from the store only when opened; identity is the
/// revision id, not the source file's etag. Used to expose a revision
/// through file-shaped APIs (previews, downloads) without granting writes.
pub struct RevisionFile {
    source: FileHandle,
    store: Arc<dyn ObjectVersionStore>,
    urn: ObjectKey,
    revision_id: VersionId,
    provider: VersionProvider,
}

impl RevisionFile {
    pub(crate) fn new(
        source: FileHandle,
        store: Arc<dyn ObjectVersionStore>,
        urn: ObjectKey,
        revision_id: VersionId,
    ) -> Self {
        Self {
            source,
            store,
            urn,
            revision_id,
            provider: VersionProvider::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn mime_type(&self) -> &str {
        &self.source.mime_type
    }

    /// The revision id doubles as the view's etag
    pub fn etag(&self) -> &str {
        self.revision_id.as_str()
    }

    pub fn revision_id(&self) -> &VersionId {
        &self.revision_id
    }

    /// Open the revision's content as a stream (lazy; nothing is fetched
    /// before this call)
    pub async fn open(&self) -> VersionResult<VersionStream> {
        self.provider
            .read(&self.store, &self.urn, &self.revision_id)
            .await
    }

    /// Convenience read of the whole content; prefer `open` for large files
    pub async fn read_to_bytes(&self) -> VersionResult<Bytes> {
        let mut stream = self.open().await?;
        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .await
            .map_err(|e| VersionError::Provider {
                message: format!("failed to read revision content: {}", e),
                source: Some(e.to_string()),
            })?;
        Ok(Bytes::from(buf))
    }

    pub fn write(&self) -> VersionResult<()> {
        Err(Self::read_only("write"))
    }

    pub fn rename(&self, _target: &str) -> VersionResult<()> {
        Err(Self::read_only("rename"))
    }

    pub fn delete(&self) -> VersionResult<()> {
        Err(Self::read_only("delete"))
    }

    pub fn lock(&self) -> VersionResult<()> {
        Err(Self::read_only("lock"))
    }

    fn read_only(operation: &str) -> VersionError {
        VersionError::PermissionDenied {
            operation: operation.to_string(),
            reason: "revision files are read only".to_string(),
        }
    }
}
