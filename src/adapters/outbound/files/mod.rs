use crate::{
    domain::errors::VersionResult,
    ports::files::{CacheUpdate, ChangeScanner, MetadataCache},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory metadata cache, for tests and local development
#[derive(Default)]
pub struct InMemoryMetadataCache {
    entries: RwLock<HashMap<u64, CacheUpdate>>,
}

impl InMemoryMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last update pushed for a file, if any
    pub async fn entry(&self, file_id: u64) -> Option<CacheUpdate> {
        self.entries.read().await.get(&file_id).cloned()
    }
}

#[async_trait]
impl MetadataCache for InMemoryMetadataCache {
    async fn update(&self, file_id: u64, update: CacheUpdate) -> VersionResult<()> {
        self.entries.write().await.insert(file_id, update);
        Ok(())
    }
}

/// Change scanner double recording the paths it was asked to scan
#[derive(Default)]
pub struct RecordingChangeScanner {
    paths: RwLock<Vec<String>>,
}

impl RecordingChangeScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn scanned_paths(&self) -> Vec<String> {
        self.paths.read().await.clone()
    }
}

#[async_trait]
impl ChangeScanner for RecordingChangeScanner {
    async fn scan(&self, path: &str) -> VersionResult<()> {
        self.paths.write().await.push(path.to_string());
        Ok(())
    }
}
