pub mod errors;
pub mod models;
pub mod value_objects;

pub use errors::{ValidationError, VersionError, VersionResult};
pub use models::{Permissions, RevisionRecord, LABEL_KEY};
pub use value_objects::{BucketName, ObjectKey, VersionId};
