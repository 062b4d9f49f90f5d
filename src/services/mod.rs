pub mod backend;
mod external_backend;
mod history_service;
mod primary_backend;
mod revision_file;
pub mod tag_codec;
mod version_provider;

pub use backend::{BackendResolver, S3VersionBackend, VersionBackend};
pub use external_backend::{external_mount_backend, ExternalMountBackend, ExternalMountResolver};
pub use history_service::RevisionHistoryService;
pub use primary_backend::{primary_storage_backend, PrimaryStorageBackend, PrimaryStorageResolver};
pub use revision_file::RevisionFile;
pub use version_provider::VersionProvider;
