use crate::domain::{
    errors::VersionResult,
    value_objects::{BucketName, ObjectKey, VersionId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Readable byte stream of one version's content
pub type VersionStream = Box<dyn tokio::io::AsyncRead + Send + Unpin>;

/// One entry from a version listing
#[derive(Debug, Clone)]
pub struct ObjectVersionInfo {
    /// Raw key as reported by the store; prefix listings may return keys
    /// that merely extend the queried key
    pub key: String,
    pub version_id: VersionId,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
    pub is_latest: bool,
}

/// A key/value tag attached to one object version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Port for the S3 versioning client capability, bound to one bucket.
///
/// These are the only object-store operations the revision layer uses.
/// The bucket-level versioning calls exist for the administration surface;
/// per-file code never touches them.
#[async_trait]
pub trait ObjectVersionStore: Send + Sync + 'static {
    /// The bucket this connection is bound to
    fn bucket(&self) -> &BucketName;

    /// List all object versions whose key starts with `prefix`
    async fn list_object_versions(&self, prefix: &str) -> VersionResult<Vec<ObjectVersionInfo>>;

    /// Fetch the tag set of one version
    async fn get_object_tagging(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<Vec<Tag>>;

    /// Replace the tag set of one version
    async fn put_object_tagging(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
        tags: Vec<Tag>,
    ) -> VersionResult<()>;

    /// Permanently delete one version
    async fn delete_object_version(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<()>;

    /// Server-side copy of a historical version over the current object,
    /// creating a new version in the chain
    async fn copy_version_to_current(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<()>;

    /// Stream the content of one version
    async fn get_object_version(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<VersionStream>;

    /// Whether bucket versioning is enabled
    async fn versioning_enabled(&self) -> VersionResult<bool>;

    /// Enable bucket versioning (one-time administrative action)
    async fn enable_versioning(&self) -> VersionResult<()>;
}
