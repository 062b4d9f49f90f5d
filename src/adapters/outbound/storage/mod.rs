pub mod error;
mod in_memory_version_store;
pub mod s3;

pub use error::StoreError;
pub use in_memory_version_store::InMemoryVersionStore;
pub use s3::{S3ClientConfig, S3VersionClient};
