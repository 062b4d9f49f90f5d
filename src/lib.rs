pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core values and errors
pub use domain::{
    BucketName,
    ObjectKey,
    Permissions,
    RevisionRecord,
    ValidationError,
    VersionError,
    VersionId,
    VersionResult,
    LABEL_KEY,
};

// Port types - interfaces for external systems
pub use ports::{
    CacheUpdate,
    ChangeScanner,
    ExternalMountStorage,
    FileHandle,
    FileStorage,
    LocalStorage,
    MetadataCache,
    ObjectVersionInfo,
    // Storage ports
    ObjectVersionStore,
    PathRemapStorage,
    PrimaryObjectStorage,
    Tag,
    VersionStream,
};

// Service implementations - revision logic
pub use services::{
    BackendResolver, ExternalMountResolver, PrimaryStorageResolver, RevisionFile,
    RevisionHistoryService, S3VersionBackend, VersionBackend, VersionProvider,
};

// Application factory and configuration
pub use app::{
    create_in_memory_app, create_s3_app, AppBuilder, AppConfig, AppError, AppServices,
    ConfigManager, ConfiguredBucket, ConnectionBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    files::{InMemoryMetadataCache, RecordingChangeScanner},
    storage::{InMemoryVersionStore, S3ClientConfig, S3VersionClient, StoreError},
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, create_s3_app, AppBuilder, AppServices, BucketName, FileHandle,
        FileStorage, InMemoryVersionStore, ObjectKey, ObjectVersionStore, Permissions,
        RevisionHistoryService, RevisionRecord, S3VersionClient, VersionId, VersionProvider,
    };
}
