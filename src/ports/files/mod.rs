mod cache;
mod file;
mod storage;

pub use cache::{CacheUpdate, ChangeScanner, MetadataCache};
pub use file::FileHandle;
pub use storage::{
    ExternalMountStorage, FileStorage, LocalStorage, PathRemapStorage, PrimaryObjectStorage,
};
