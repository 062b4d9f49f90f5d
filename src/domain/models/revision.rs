use crate::domain::value_objects::VersionId;
use std::collections::HashMap;

/// Reserved metadata key carrying the user-facing revision label
pub const LABEL_KEY: &str = "label";

/// One historical revision of a file.
///
/// Built fresh from the object store on every listing; name, MIME type and
/// file id always reflect the *current* file since the store does not
/// version them.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionRecord {
    /// Seconds since epoch, from the store's last-modified time for the version
    pub timestamp: i64,
    /// The store's native version identifier
    pub revision_id: VersionId,
    /// Current name of the owning file
    pub display_name: String,
    /// Byte length of this revision's content
    pub size: u64,
    /// Current MIME type of the owning file
    pub mime_type: String,
    /// Storage-independent identity: `<file-id>/<timestamp>`
    pub etag: String,
    /// Id of the owning file
    pub file_id: u64,
    /// Decoded metadata tags; the `label` key is reserved for user labels
    pub metadata: HashMap<String, String>,
}

impl RevisionRecord {
    pub fn new(
        timestamp: i64,
        revision_id: VersionId,
        display_name: String,
        size: u64,
        mime_type: String,
        file_id: u64,
        metadata: HashMap<String, String>,
    ) -> Self {
        let etag = format!("{}/{}", file_id, timestamp);
        Self {
            timestamp,
            revision_id,
            display_name,
            size,
            mime_type,
            etag,
            file_id,
            metadata,
        }
    }

    /// The user-facing label, empty when none was set
    pub fn label(&self) -> &str {
        self.metadata.get(LABEL_KEY).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(metadata: HashMap<String, String>) -> RevisionRecord {
        RevisionRecord::new(
            1700000000,
            VersionId::new("v1".to_string()).unwrap(),
            "report.txt".to_string(),
            42,
            "text/plain".to_string(),
            7,
            metadata,
        )
    }

    #[test]
    fn test_etag_combines_file_id_and_timestamp() {
        let rev = record(HashMap::new());
        assert_eq!(rev.etag, "7/1700000000");
    }

    #[test]
    fn test_label_defaults_to_empty() {
        let rev = record(HashMap::new());
        assert_eq!(rev.label(), "");

        let mut metadata = HashMap::new();
        metadata.insert(LABEL_KEY.to_string(), "before rewrite".to_string());
        let rev = record(metadata);
        assert_eq!(rev.label(), "before rewrite");
    }
}
