use std::sync::Arc;

use crate::{
    adapters::outbound::storage::{
        InMemoryVersionStore, S3ClientConfig, S3VersionClient, StoreError,
    },
    domain::{errors::ValidationError, value_objects::BucketName},
    ports::storage::ObjectVersionStore,
    services::{
        external_mount_backend, primary_storage_backend, RevisionHistoryService, VersionBackend,
    },
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub connection: ConnectionBackend,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionBackend::InMemory {
                bucket: "version-history".to_string(),
            },
        }
    }
}

/// Object-store connection configuration
#[derive(Debug, Clone)]
pub enum ConnectionBackend {
    InMemory {
        bucket: String,
    },
    S3 {
        endpoint: String,
        region: String,
        bucket: String,
        access_key: String,
        secret_key: String,
    },
}

/// Application services container
pub struct AppServices {
    pub history: RevisionHistoryService,
    pub connection: Arc<dyn ObjectVersionStore>,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_connection(mut self, connection: ConnectionBackend) -> Self {
        self.config.connection = connection;
        self
    }

    /// Build the connection and wire the backends into the history service.
    ///
    /// The primary-storage backend claims object-store-backed primary
    /// storage; the external-mount backend accepts everything else and is
    /// registered last.
    pub fn build(self) -> Result<AppServices, AppError> {
        let connection = self.create_connection()?;
        let backends: Vec<Arc<dyn VersionBackend>> = vec![
            Arc::new(primary_storage_backend()),
            Arc::new(external_mount_backend()),
        ];
        Ok(AppServices {
            history: RevisionHistoryService::new(backends),
            connection,
        })
    }

    fn create_connection(&self) -> Result<Arc<dyn ObjectVersionStore>, AppError> {
        match &self.config.connection {
            ConnectionBackend::InMemory { bucket } => {
                let bucket = BucketName::new(bucket.clone())?;
                Ok(Arc::new(InMemoryVersionStore::new(bucket)))
            }
            ConnectionBackend::S3 {
                endpoint,
                region,
                bucket,
                access_key,
                secret_key,
            } => {
                let bucket = BucketName::new(bucket.clone())?;
                let client = S3VersionClient::new(S3ClientConfig {
                    endpoint: endpoint.clone(),
                    region: region.clone(),
                    bucket,
                    access_key: access_key.clone(),
                    secret_key: secret_key.clone(),
                })?;
                Ok(Arc::new(client))
            }
        }
    }
}

/// Create application services backed by an in-memory store
pub fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new().build()
}

/// Create application services backed by an S3-compatible endpoint
pub fn create_s3_app(
    endpoint: String,
    region: String,
    bucket: String,
    access_key: String,
    secret_key: String,
) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_connection(ConnectionBackend::S3 {
            endpoint,
            region,
            bucket,
            access_key,
            secret_key,
        })
        .build()
}

/// Errors during application construction
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to create store connection: {0}")]
    Store(#[from] StoreError),
}

/// One bucket known to the administration surface
pub enum ConfiguredBucket {
    Ready {
        id: String,
        connection: Arc<dyn ObjectVersionStore>,
    },
    /// Connection could not be constructed; reported instead of failing the
    /// whole listing
    Broken { id: String, error: String },
}

impl ConfiguredBucket {
    pub fn id(&self) -> &str {
        match self {
            ConfiguredBucket::Ready { id, .. } => id,
            ConfiguredBucket::Broken { id, .. } => id,
        }
    }
}

/// Resolves the set of configured buckets for the administration CLI
pub struct ConfigManager {
    configs: Vec<ConfiguredBucket>,
}

impl ConfigManager {
    pub fn new(configs: Vec<ConfiguredBucket>) -> Self {
        Self { configs }
    }

    /// Build one entry per bucket against a shared S3 endpoint
    pub fn from_s3_endpoint(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        buckets: &[String],
    ) -> Self {
        let configs = buckets
            .iter()
            .map(|bucket| {
                let built = BucketName::new(bucket.clone())
                    .map_err(AppError::Validation)
                    .and_then(|bucket_name| {
                        S3VersionClient::new(S3ClientConfig {
                            endpoint: endpoint.to_string(),
                            region: region.to_string(),
                            bucket: bucket_name,
                            access_key: access_key.to_string(),
                            secret_key: secret_key.to_string(),
                        })
                        .map_err(AppError::Store)
                    });
                match built {
                    Ok(client) => ConfiguredBucket::Ready {
                        id: bucket.clone(),
                        connection: Arc::new(client),
                    },
                    Err(err) => ConfiguredBucket::Broken {
                        id: bucket.clone(),
                        error: err.to_string(),
                    },
                }
            })
            .collect();
        Self { configs }
    }

    pub fn configs(&self) -> &[ConfiguredBucket] {
        &self.configs
    }

    pub fn find(&self, id: &str) -> Option<&ConfiguredBucket> {
        self.configs.iter().find(|config| config.id() == id)
    }
}
