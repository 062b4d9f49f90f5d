use crate::domain::models::Permissions;
use crate::ports::files::FileStorage;
use std::sync::Arc;

/// Handle to a file in the document service, as the file-resolution
/// capability hands it to us.
///
/// Name, MIME type and size reflect the current file; the object store does
/// not version them.
#[derive(Clone)]
pub struct FileHandle {
    pub id: u64,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    /// Path relative to the file's storage (possibly inside remap wrappers)
    pub internal_path: String,
    pub permissions: Permissions,
    pub storage: Arc<FileStorage>,
}
