use crate::{
    domain::{
        errors::{VersionError, VersionResult},
        models::RevisionRecord,
        value_objects::{ObjectKey, VersionId},
    },
    ports::{
        files::FileHandle,
        storage::{ObjectVersionStore, Tag, VersionStream},
    },
    services::tag_codec,
};
use futures::future;
use std::sync::Arc;

// Tag budget of S3-compatible stores; exceeding it fails server-side, so we
// reject before issuing the write.
const MAX_TAGS_PER_VERSION: usize = 10;
const MAX_TAG_KEY_BYTES: usize = 128;
const MAX_TAG_VALUE_BYTES: usize = 256;

/// Stateless translation between object-store version semantics and the
/// revision-history abstraction.
///
/// Every operation takes the connection and key as input; nothing is cached
/// between calls.
#[derive(Debug, Clone, Default)]
pub struct VersionProvider;

impl VersionProvider {
    pub fn new() -> Self {
        Self
    }

    /// List the historical revisions of the object at `urn`, newest first.
    ///
    /// The live object is not part of the history, and prefix listings can
    /// return unrelated keys that merely extend `urn`, so entries are kept
    /// only on an exact key match with the latest version excluded.
    pub async fn get_versions(
        &self,
        store: &Arc<dyn ObjectVersionStore>,
        urn: &ObjectKey,
        file: &FileHandle,
    ) -> VersionResult<Vec<RevisionRecord>> {
        let listed = store.list_object_versions(urn.as_str()).await?;
        let historical: Vec<_> = listed
            .into_iter()
            .filter(|version| version.key == urn.as_str() && !version.is_latest)
            .collect();

        // The per-version tag reads are independent; fetch them concurrently
        // and let the final sort restore the ordering contract.
        let fetches = historical.into_iter().map(|version| {
            let store = Arc::clone(store);
            let urn = urn.clone();
            async move {
                let tags = store.get_object_tagging(&urn, &version.version_id).await?;
                Ok::<_, VersionError>((version, tags))
            }
        });
        let tagged = future::try_join_all(fetches).await?;

        let mut revisions: Vec<RevisionRecord> = tagged
            .into_iter()
            .map(|(version, tags)| {
                let metadata = tag_codec::decode_version_metadata(&tags);
                RevisionRecord::new(
                    version.last_modified.timestamp(),
                    version.version_id,
                    file.name.clone(),
                    version.size,
                    file.mime_type.clone(),
                    file.id,
                    metadata,
                )
            })
            .collect();
        revisions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(revisions)
    }

    /// Stream the content of one revision without buffering it
    pub async fn read(
        &self,
        store: &Arc<dyn ObjectVersionStore>,
        urn: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<VersionStream> {
        store.get_object_version(urn, version_id).await
    }

    /// Restore a revision as the current content.
    ///
    /// Server-side copy over the current object; the previously-current
    /// content becomes a new historical entry in the version chain.
    pub async fn rollback(
        &self,
        store: &Arc<dyn ObjectVersionStore>,
        urn: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<()> {
        store.copy_version_to_current(urn, version_id).await
    }

    /// Upsert or remove one metadata entry on a revision.
    ///
    /// Read-modify-write of the version's tag set; an empty `value` removes
    /// the entry, unrelated tags are preserved either way.
    pub async fn set_version_metadata(
        &self,
        store: &Arc<dyn ObjectVersionStore>,
        urn: &ObjectKey,
        version_id: &VersionId,
        key: &str,
        value: &str,
    ) -> VersionResult<()> {
        let mut tags = store.get_object_tagging(urn, version_id).await?;
        let tag_key = format!("{}{}", tag_codec::METADATA_TAG_PREFIX, key);

        if value.is_empty() {
            // Empty value is the deletion signal
            tags.retain(|tag| tag.key != tag_key);
        } else {
            let encoded = tag_codec::encode_tag_value(value);
            match tags.iter_mut().find(|tag| tag.key == tag_key) {
                Some(tag) => tag.value = encoded,
                None => tags.push(Tag {
                    key: tag_key,
                    value: encoded,
                }),
            }
        }

        Self::check_tag_budget(&tags)?;
        store.put_object_tagging(urn, version_id, tags).await
    }

    /// Permanently delete one revision
    pub async fn delete_version(
        &self,
        store: &Arc<dyn ObjectVersionStore>,
        urn: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<()> {
        store.delete_object_version(urn, version_id).await
    }

    fn check_tag_budget(tags: &[Tag]) -> VersionResult<()> {
        if tags.len() > MAX_TAGS_PER_VERSION {
            return Err(VersionError::Provider {
                message: format!(
                    "tag set would hold {} tags, the store allows {}",
                    tags.len(),
                    MAX_TAGS_PER_VERSION
                ),
                source: None,
            });
        }
        for tag in tags {
            if tag.key.len() > MAX_TAG_KEY_BYTES {
                return Err(VersionError::Provider {
                    message: format!(
                        "tag key '{}' is {} bytes, the store allows {}",
                        tag.key,
                        tag.key.len(),
                        MAX_TAG_KEY_BYTES
                    ),
                    source: None,
                });
            }
            if tag.value.len() > MAX_TAG_VALUE_BYTES {
                return Err(VersionError::Provider {
                    message: format!(
                        "value for tag '{}' is {} bytes, the store allows {}",
                        tag.key,
                        tag.value.len(),
                        MAX_TAG_VALUE_BYTES
                    ),
                    source: None,
                });
            }
        }
        Ok(())
    }
}
