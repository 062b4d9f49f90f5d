use crate::{
    adapters::outbound::storage::error::StoreError,
    domain::{
        errors::VersionResult,
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::storage::{ObjectVersionInfo, ObjectVersionStore, Tag, VersionStream},
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

// Deterministic base for the logical clock; each write advances one second
// so listings always have distinct, ordered timestamps.
const CLOCK_EPOCH: i64 = 1_700_000_000;

/// In-memory double of an S3 bucket with versioning and per-version tagging,
/// for tests and local development.
///
/// Versioning starts disabled, as on a fresh bucket; enable it through the
/// administration call before expecting history.
pub struct InMemoryVersionStore {
    bucket: BucketName,
    data: RwLock<StoreData>,
    operations: AtomicUsize,
}

#[derive(Default)]
struct StoreData {
    versioning_enabled: bool,
    /// key -> versions in chronological order (last entry is current)
    objects: HashMap<String, Vec<StoredVersion>>,
    clock: i64,
}

#[derive(Clone)]
struct StoredVersion {
    version_id: VersionId,
    data: Bytes,
    last_modified: DateTime<Utc>,
    tags: Vec<Tag>,
}

impl InMemoryVersionStore {
    pub fn new(bucket: BucketName) -> Self {
        Self {
            bucket,
            data: RwLock::new(StoreData::default()),
            operations: AtomicUsize::new(0),
        }
    }

    /// Number of store calls issued through the port; lets tests assert
    /// that unresolved files never reach the client
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Upload content for a key, creating a new version when versioning is
    /// enabled and replacing the current one otherwise
    pub async fn put_object(&self, key: &str, content: impl Into<Bytes>) -> VersionId {
        let mut data = self.data.write().await;
        data.clock += 1;
        let versioning_enabled = data.versioning_enabled;
        let version = StoredVersion {
            version_id: VersionId::new(Uuid::new_v4().simple().to_string()).unwrap(),
            data: content.into(),
            last_modified: DateTime::from_timestamp(CLOCK_EPOCH + data.clock, 0)
                .unwrap_or_default(),
            tags: Vec::new(),
        };
        let version_id = version.version_id.clone();
        let versions = data.objects.entry(key.to_string()).or_default();
        if versioning_enabled {
            versions.push(version);
        } else {
            *versions = vec![version];
        }
        version_id
    }

    /// Content of the current version, for assertions after rollback
    pub async fn current_content(&self, key: &str) -> Option<Bytes> {
        let data = self.data.read().await;
        data.objects
            .get(key)
            .and_then(|versions| versions.last())
            .map(|version| version.data.clone())
    }

    fn count_op(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }

    fn not_found(key: &ObjectKey, version_id: &VersionId) -> StoreError {
        StoreError::VersionNotFound {
            key: key.as_str().to_string(),
            version_id: version_id.as_str().to_string(),
        }
    }
}

#[async_trait]
impl ObjectVersionStore for InMemoryVersionStore {
    fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    async fn list_object_versions(&self, prefix: &str) -> VersionResult<Vec<ObjectVersionInfo>> {
        self.count_op();
        let data = self.data.read().await;
        let mut listed = Vec::new();
        for (key, versions) in &data.objects {
            if !key.starts_with(prefix) {
                continue;
            }
            let current = versions.len().saturating_sub(1);
            for (index, version) in versions.iter().enumerate() {
                listed.push(ObjectVersionInfo {
                    key: key.clone(),
                    version_id: version.version_id.clone(),
                    last_modified: version.last_modified,
                    size: version.data.len() as u64,
                    is_latest: index == current,
                });
            }
        }
        Ok(listed)
    }

    async fn get_object_tagging(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<Vec<Tag>> {
        self.count_op();
        let data = self.data.read().await;
        let version = data
            .objects
            .get(key.as_str())
            .and_then(|versions| versions.iter().find(|v| v.version_id == *version_id))
            .ok_or_else(|| Self::not_found(key, version_id))?;
        Ok(version.tags.clone())
    }

    async fn put_object_tagging(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
        tags: Vec<Tag>,
    ) -> VersionResult<()> {
        self.count_op();
        let mut data = self.data.write().await;
        let version = data
            .objects
            .get_mut(key.as_str())
            .and_then(|versions| versions.iter_mut().find(|v| v.version_id == *version_id))
            .ok_or_else(|| Self::not_found(key, version_id))?;
        version.tags = tags;
        Ok(())
    }

    async fn delete_object_version(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<()> {
        self.count_op();
        let mut data = self.data.write().await;
        let versions = data
            .objects
            .get_mut(key.as_str())
            .ok_or_else(|| Self::not_found(key, version_id))?;
        let before = versions.len();
        versions.retain(|v| v.version_id != *version_id);
        if versions.len() == before {
            return Err(Self::not_found(key, version_id).into());
        }
        if versions.is_empty() {
            data.objects.remove(key.as_str());
        }
        Ok(())
    }

    async fn copy_version_to_current(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<()> {
        self.count_op();
        let mut data = self.data.write().await;
        data.clock += 1;
        let timestamp = CLOCK_EPOCH + data.clock;
        let versions = data
            .objects
            .get_mut(key.as_str())
            .ok_or_else(|| Self::not_found(key, version_id))?;
        let source = versions
            .iter()
            .find(|v| v.version_id == *version_id)
            .ok_or_else(|| Self::not_found(key, version_id))?;
        let copy = StoredVersion {
            version_id: VersionId::new(Uuid::new_v4().simple().to_string()).unwrap(),
            data: source.data.clone(),
            last_modified: DateTime::from_timestamp(timestamp, 0).unwrap_or_default(),
            tags: source.tags.clone(),
        };
        versions.push(copy);
        Ok(())
    }

    async fn get_object_version(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<VersionStream> {
        self.count_op();
        let data = self.data.read().await;
        let version = data
            .objects
            .get(key.as_str())
            .and_then(|versions| versions.iter().find(|v| v.version_id == *version_id))
            .ok_or_else(|| Self::not_found(key, version_id))?;
        Ok(Box::new(std::io::Cursor::new(version.data.clone())))
    }

    async fn versioning_enabled(&self) -> VersionResult<bool> {
        self.count_op();
        Ok(self.data.read().await.versioning_enabled)
    }

    async fn enable_versioning(&self) -> VersionResult<()> {
        self.count_op();
        self.data.write().await.versioning_enabled = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> BucketName {
        BucketName::new("test-bucket".to_string()).unwrap()
    }

    #[tokio::test]
    async fn unversioned_put_replaces_current() {
        let store = InMemoryVersionStore::new(bucket());
        store.put_object("doc", "one").await;
        store.put_object("doc", "two").await;

        let listed = store.list_object_versions("doc").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(store.current_content("doc").await.unwrap(), Bytes::from("two"));
    }

    #[tokio::test]
    async fn versioned_put_appends_and_flags_latest() {
        let store = InMemoryVersionStore::new(bucket());
        store.enable_versioning().await.unwrap();
        let first = store.put_object("doc", "one").await;
        let second = store.put_object("doc", "two").await;

        let listed = store.list_object_versions("doc").await.unwrap();
        assert_eq!(listed.len(), 2);
        let latest: Vec<_> = listed.iter().filter(|v| v.is_latest).collect();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].version_id, second);
        assert!(listed.iter().any(|v| v.version_id == first && !v.is_latest));
    }
}
