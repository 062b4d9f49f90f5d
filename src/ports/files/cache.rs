use crate::domain::errors::VersionResult;
use async_trait::async_trait;

/// Fresh file metadata pushed into the service's cache after a rollback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheUpdate {
    /// Seconds since epoch
    pub mtime: i64,
    pub size: u64,
    pub etag: String,
}

/// Port for the service's database-backed file metadata cache.
///
/// The cache is not object-store-aware; after a rollback it must be told the
/// restored size and a fresh etag or it would keep serving stale metadata.
#[async_trait]
pub trait MetadataCache: Send + Sync + 'static {
    async fn update(&self, file_id: u64, update: CacheUpdate) -> VersionResult<()>;
}

/// Port for an external mount's change scanner.
///
/// External mounts have no cache write-through; triggering a scan on the
/// file's path makes the directory cache pick up the new size/etag on next
/// access.
#[async_trait]
pub trait ChangeScanner: Send + Sync + 'static {
    async fn scan(&self, path: &str) -> VersionResult<()>;
}
