use crate::domain::errors::ValidationError;

/// Errors that can occur while working with file revisions
#[derive(Debug, Clone)]
pub enum VersionError {
    /// Referenced revision, key, or bucket no longer exists
    NotFound { key: String, version_id: String },

    /// Caller lacks the file permission required for a mutating operation
    PermissionDenied { operation: String, reason: String },

    /// Underlying object-store call failed (network, auth, quota, malformed response)
    Provider {
        message: String,
        source: Option<String>, // Store cause as string to allow Clone
    },

    /// Invalid key, bucket, or version id input
    Validation(ValidationError),
}

impl std::fmt::Display for VersionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionError::NotFound { key, version_id } => {
                write!(f, "Version '{}' not found for object: {}", version_id, key)
            }
            VersionError::PermissionDenied { operation, reason } => {
                write!(f, "Permission denied for '{}': {}", operation, reason)
            }
            VersionError::Provider { message, .. } => {
                write!(f, "Object store error: {}", message)
            }
            VersionError::Validation(err) => {
                write!(f, "Validation error: {}", err)
            }
        }
    }
}

impl std::error::Error for VersionError {}

impl From<ValidationError> for VersionError {
    fn from(err: ValidationError) -> Self {
        VersionError::Validation(err)
    }
}

impl VersionError {
    /// True when the error means the referenced revision is gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, VersionError::NotFound { .. })
    }

    /// True when the error is a pre-flight permission failure
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, VersionError::PermissionDenied { .. })
    }
}

/// Result type for revision operations
pub type VersionResult<T> = Result<T, VersionError>;
