//! Serde DTOs for the S3 XML wire format used by the version client.

use serde::{Deserialize, Serialize};

/// GET /{bucket}?versions response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListVersionsResult {
    pub is_truncated: bool,
    pub next_key_marker: Option<String>,
    pub next_version_id_marker: Option<String>,
    #[serde(rename = "Version")]
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionEntry {
    pub key: String,
    pub version_id: String,
    #[serde(default)]
    pub is_latest: bool,
    pub last_modified: String,
    #[serde(default)]
    pub size: u64,
}

/// GET/PUT /{bucket}/{key}?tagging document
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename = "Tagging", rename_all = "PascalCase")]
pub struct TaggingDocument {
    pub tag_set: TagSet,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagSet {
    #[serde(rename = "Tag", default)]
    pub tags: Vec<TagEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagEntry {
    pub key: String,
    pub value: String,
}

/// GET /{bucket}?versioning response; `status` is absent on buckets that
/// were never versioned
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VersioningConfiguration {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_versions_result() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListVersionsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>test-bucket</Name>
  <Prefix>urn:oid:42</Prefix>
  <MaxKeys>1000</MaxKeys>
  <IsTruncated>false</IsTruncated>
  <Version>
    <Key>urn:oid:42</Key>
    <VersionId>3HL4kqtJlcpXroDTDmJ.rmSpXd3dIbrHY</VersionId>
    <IsLatest>true</IsLatest>
    <LastModified>2023-11-14T22:13:20.000Z</LastModified>
    <ETag>"599bab3ed2c697f1d26842727561fd94"</ETag>
    <Size>11</Size>
    <StorageClass>STANDARD</StorageClass>
  </Version>
  <Version>
    <Key>urn:oid:42</Key>
    <VersionId>QUpfdndhfd8438MNFDN93jdnJFkdmqnh</VersionId>
    <IsLatest>false</IsLatest>
    <LastModified>2023-11-14T22:11:00.000Z</LastModified>
    <ETag>"6805f2cfc46c0f04559748bb039d69ae"</ETag>
    <Size>4</Size>
    <StorageClass>STANDARD</StorageClass>
  </Version>
</ListVersionsResult>"#;

        let result: ListVersionsResult = quick_xml::de::from_str(xml).unwrap();
        assert!(!result.is_truncated);
        assert_eq!(result.versions.len(), 2);
        assert_eq!(result.versions[0].key, "urn:oid:42");
        assert!(result.versions[0].is_latest);
        assert_eq!(result.versions[1].size, 4);
        assert_eq!(
            result.versions[1].last_modified,
            "2023-11-14T22:11:00.000Z"
        );
    }

    #[test]
    fn test_parse_empty_tag_set() {
        let xml = r#"<Tagging><TagSet></TagSet></Tagging>"#;
        let doc: TaggingDocument = quick_xml::de::from_str(xml).unwrap();
        assert!(doc.tag_set.tags.is_empty());
    }

    #[test]
    fn test_tagging_round_trip() {
        let doc = TaggingDocument {
            tag_set: TagSet {
                tags: vec![TagEntry {
                    key: "metadata:label".to_string(),
                    value: "bGFiZWw-".to_string(),
                }],
            },
        };
        let xml = quick_xml::se::to_string(&doc).unwrap();
        assert!(xml.contains("<Tagging>"));
        assert!(xml.contains("<Key>metadata:label</Key>"));

        let parsed: TaggingDocument = quick_xml::de::from_str(&xml).unwrap();
        assert_eq!(parsed.tag_set.tags.len(), 1);
        assert_eq!(parsed.tag_set.tags[0].value, "bGFiZWw-");
    }

    #[test]
    fn test_parse_versioning_status() {
        let enabled: VersioningConfiguration = quick_xml::de::from_str(
            r#"<VersioningConfiguration><Status>Enabled</Status></VersioningConfiguration>"#,
        )
        .unwrap();
        assert_eq!(enabled.status.as_deref(), Some("Enabled"));

        let never: VersioningConfiguration =
            quick_xml::de::from_str(r#"<VersioningConfiguration></VersioningConfiguration>"#)
                .unwrap();
        assert_eq!(never.status, None);
    }
}
