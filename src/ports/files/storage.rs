use crate::domain::value_objects::ObjectKey;
use crate::ports::files::{ChangeScanner, MetadataCache};
use crate::ports::storage::ObjectVersionStore;
use std::sync::Arc;

/// The storage implementation holding a file's content.
///
/// A closed set of variants replaces run-time type probing of storage
/// wrapper chains: the backend adapters match on the variant they own and
/// walk `PathRemap` layers with an explicit loop.
#[derive(Clone)]
pub enum FileStorage {
    /// Service-owned primary storage keeping content in an S3-backed store,
    /// addressed by file id URN
    Primary(PrimaryObjectStorage),
    /// Externally mounted S3 bucket exposed as generic network storage,
    /// addressed by backend-relative path
    ExternalMount(ExternalMountStorage),
    /// Wrapper re-rooting another storage at a subdirectory
    PathRemap(PathRemapStorage),
    /// Storage with no object-store-native versioning (local disk etc.)
    Local(LocalStorage),
}

#[derive(Clone)]
pub struct PrimaryObjectStorage {
    pub id: String,
    pub connection: Arc<dyn ObjectVersionStore>,
    pub cache: Arc<dyn MetadataCache>,
}

#[derive(Clone)]
pub struct ExternalMountStorage {
    pub id: String,
    pub connection: Arc<dyn ObjectVersionStore>,
    pub scanner: Arc<dyn ChangeScanner>,
}

#[derive(Clone)]
pub struct PathRemapStorage {
    /// Subdirectory of the inner storage this wrapper is rooted at
    pub root: String,
    pub inner: Arc<FileStorage>,
}

#[derive(Clone)]
pub struct LocalStorage {
    pub id: String,
}

impl PathRemapStorage {
    /// Map a path inside this wrapper to the path within the inner storage
    pub fn rebased(&self, path: &str) -> String {
        if self.root.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.root, path)
        }
    }
}

impl FileStorage {
    pub fn id(&self) -> &str {
        match self {
            FileStorage::Primary(storage) => &storage.id,
            FileStorage::ExternalMount(storage) => &storage.id,
            FileStorage::PathRemap(storage) => storage.inner.id(),
            FileStorage::Local(storage) => &storage.id,
        }
    }

    /// Unwind path-remapping layers, returning the innermost storage and the
    /// path relative to it
    pub fn resolve_path(&self, path: &str) -> (&FileStorage, String) {
        let mut storage = self;
        let mut path = path.to_string();
        while let FileStorage::PathRemap(remap) = storage {
            path = remap.rebased(&path);
            storage = remap.inner.as_ref();
        }
        (storage, path)
    }

    /// Content URN for a file held in object-store-backed primary storage
    pub fn urn_for(&self, file_id: u64) -> Option<ObjectKey> {
        match self {
            FileStorage::Primary(_) => ObjectKey::new(format!("urn:oid:{}", file_id)).ok(),
            _ => None,
        }
    }
}
