mod version_store;

pub use version_store::{ObjectVersionInfo, ObjectVersionStore, Tag, VersionStream};
