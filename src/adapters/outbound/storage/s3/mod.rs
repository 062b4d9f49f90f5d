mod s3_version_client;
pub mod sigv4;
mod xml;

pub use s3_version_client::{S3ClientConfig, S3VersionClient};
