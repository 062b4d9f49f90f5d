pub mod files;
pub mod storage;

pub use files::{
    CacheUpdate, ChangeScanner, ExternalMountStorage, FileHandle, FileStorage, LocalStorage,
    MetadataCache, PathRemapStorage, PrimaryObjectStorage,
};
pub use storage::{ObjectVersionInfo, ObjectVersionStore, Tag, VersionStream};
