use crate::domain::errors::ValidationError;

/// The object store's native identifier for one version of an object.
///
/// S3-compatible stores hand out opaque ids (UUIDs, base64-flavored strings,
/// the literal "null" on never-versioned buckets); the only structure we can
/// rely on is printable ASCII without whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(String);

impl VersionId {
    /// Create a new VersionId with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyVersionId);
        }

        if value.len() > 1024 {
            return Err(ValidationError::VersionIdTooLong {
                actual: value.len(),
                max: 1024,
            });
        }

        for c in value.chars() {
            if !c.is_ascii_graphic() {
                return Err(ValidationError::InvalidVersionIdCharacter(c));
            }
        }

        Ok(Self(value))
    }

    /// Get the version ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
