//! Encoding of revision metadata into object-store tags.
//!
//! Tags are the only per-version key/value attachment point the store
//! offers, and their value charset is restricted while label text is
//! arbitrary UTF-8. Values are therefore base64-encoded, with '='
//! substituted by '-' since '=' is not reliably accepted in tag values.
//! All raw-tag handling lives here; the rest of the crate only sees
//! decoded metadata maps.

use crate::domain::models::LABEL_KEY;
use crate::ports::storage::Tag;
use base64::Engine;
use std::collections::HashMap;

/// Prefix marking a tag as a metadata entry; the remainder of the tag key is
/// the metadata key
pub const METADATA_TAG_PREFIX: &str = "metadata:";

/// Single tag used by the pre-prefix labeling scheme
const LEGACY_LABEL_TAG: &str = "Label";

/// Encode a metadata value into the tag-safe representation
pub fn encode_tag_value(value: &str) -> String {
    base64::engine::general_purpose::STANDARD
        .encode(value)
        .replace('=', "-")
}

/// Decode a tag value; `None` when the tag was not produced by us
pub fn decode_tag_value(value: &str) -> Option<String> {
    let padded = value.replace('-', "=");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(padded)
        .ok()?;
    String::from_utf8(bytes).ok()
}

type DecodeStrategy = fn(&[Tag], &mut HashMap<String, String>);

/// Decoding schemes in priority order; a later scheme only fills keys the
/// earlier ones left absent.
const DECODE_STRATEGIES: &[DecodeStrategy] = &[decode_prefixed_tags, decode_legacy_label];

/// Decode a version's tag set into its metadata map
pub fn decode_version_metadata(tags: &[Tag]) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    for strategy in DECODE_STRATEGIES {
        strategy(tags, &mut metadata);
    }
    metadata
}

fn decode_prefixed_tags(tags: &[Tag], metadata: &mut HashMap<String, String>) {
    for tag in tags {
        if let Some(key) = tag.key.strip_prefix(METADATA_TAG_PREFIX) {
            if let Some(value) = decode_tag_value(&tag.value) {
                metadata.insert(key.to_string(), value);
            }
        }
    }
}

fn decode_legacy_label(tags: &[Tag], metadata: &mut HashMap<String, String>) {
    if metadata.contains_key(LABEL_KEY) {
        return;
    }
    for tag in tags {
        if tag.key == LEGACY_LABEL_TAG {
            if let Some(value) = decode_tag_value(&tag.value) {
                metadata.insert(LABEL_KEY.to_string(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(key: &str, value: &str) -> Tag {
        Tag {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_encode_substitutes_padding() {
        assert_eq!(encode_tag_value("label"), "bGFiZWw-");
        assert_eq!(encode_tag_value("v1.0 final"), "djEuMCBmaW5hbA--");
    }

    #[test]
    fn test_round_trip() {
        for value in ["label", "important release", "v1.0 final", "ümläut"] {
            assert_eq!(decode_tag_value(&encode_tag_value(value)).as_deref(), Some(value));
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode_tag_value("!!not base64!!"), None);
    }

    #[test]
    fn test_decode_prefixed_scheme() {
        let tags = vec![
            tag("metadata:label", &encode_tag_value("release")),
            tag("metadata:review", &encode_tag_value("approved")),
            tag("unrelated", "kept-out"),
        ];
        let metadata = decode_version_metadata(&tags);
        assert_eq!(metadata.get("label").map(String::as_str), Some("release"));
        assert_eq!(metadata.get("review").map(String::as_str), Some("approved"));
        assert!(!metadata.contains_key("unrelated"));
    }

    #[test]
    fn test_legacy_label_fallback() {
        let tags = vec![tag("Label", &encode_tag_value("old scheme"))];
        let metadata = decode_version_metadata(&tags);
        assert_eq!(metadata.get(LABEL_KEY).map(String::as_str), Some("old scheme"));
    }

    #[test]
    fn test_prefixed_scheme_wins_over_legacy() {
        let tags = vec![
            tag("Label", &encode_tag_value("old")),
            tag("metadata:label", &encode_tag_value("new")),
        ];
        let metadata = decode_version_metadata(&tags);
        assert_eq!(metadata.get(LABEL_KEY).map(String::as_str), Some("new"));
    }
}
