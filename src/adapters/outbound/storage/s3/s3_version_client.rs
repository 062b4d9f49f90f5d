use crate::{
    adapters::outbound::storage::{
        error::StoreError,
        s3::{
            sigv4::{self, Signer, SigningRequest, EMPTY_PAYLOAD_SHA256},
            xml,
        },
    },
    domain::{
        errors::VersionResult,
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::storage::{ObjectVersionInfo, ObjectVersionStore, Tag, VersionStream},
};
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use reqwest::{Method, StatusCode};
use tokio_util::io::StreamReader;
use tracing::debug;

/// Configuration for one S3-compatible connection
#[derive(Debug, Clone)]
pub struct S3ClientConfig {
    /// Endpoint URL, e.g. `https://s3.example.com` or `http://127.0.0.1:9000`
    pub endpoint: String,
    pub region: String,
    pub bucket: BucketName,
    pub access_key: String,
    pub secret_key: String,
}

/// S3 REST client for the version operations, using path-style addressing
/// and SigV4 header signing.
pub struct S3VersionClient {
    http: reqwest::Client,
    endpoint: String,
    host: String,
    bucket: BucketName,
    signer: Signer,
}

impl S3VersionClient {
    pub fn new(config: S3ClientConfig) -> Result<Self, StoreError> {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        let url = reqwest::Url::parse(&endpoint)
            .map_err(|e| StoreError::Other(format!("invalid endpoint '{}': {}", endpoint, e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(StoreError::Other(format!(
                    "endpoint '{}' has no host",
                    endpoint
                )))
            }
        };
        let http = reqwest::Client::builder()
            .build()
            .map_err(StoreError::Transport)?;

        Ok(Self {
            http,
            endpoint,
            host,
            bucket: config.bucket,
            signer: Signer::new(config.access_key, config.secret_key, config.region),
        })
    }

    fn bucket_path(&self) -> String {
        format!("/{}", self.bucket.as_str())
    }

    fn object_path(&self, key: &ObjectKey) -> String {
        format!("/{}/{}", self.bucket.as_str(), key.as_str())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Bytes>,
        extra_headers: &[(String, String)],
        operation: &'static str,
    ) -> Result<reqwest::Response, StoreError> {
        let payload_hash = match &body {
            Some(bytes) => sigv4::sha256_hex(bytes),
            None => EMPTY_PAYLOAD_SHA256.to_string(),
        };
        let signed = self.signer.sign(&SigningRequest {
            method: method.as_str(),
            path,
            query,
            host: &self.host,
            payload_hash: &payload_hash,
            extra_headers,
            when: Utc::now(),
        });

        // The request URL reuses the canonical query so the wire form always
        // matches what was signed.
        let canonical_query = sigv4::canonical_query_string(query);
        let url = if canonical_query.is_empty() {
            format!("{}{}", self.endpoint, sigv4::encode_path(path))
        } else {
            format!(
                "{}{}?{}",
                self.endpoint,
                sigv4::encode_path(path),
                canonical_query
            )
        };
        debug!(operation, %url, "sending s3 request");

        let mut request = self
            .http
            .request(method, &url)
            .header("x-amz-date", signed.amz_date.as_str())
            .header("x-amz-content-sha256", payload_hash.as_str())
            .header("authorization", signed.authorization.as_str());
        for (key, value) in extra_headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(bytes) = body {
            request = request.body(bytes);
        }

        let response = request.send().await?;
        debug!(operation, status = %response.status(), "s3 response");
        Ok(response)
    }

    async fn expect_success(
        response: reqwest::Response,
        operation: &'static str,
        not_found: Option<(&ObjectKey, &VersionId)>,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some((key, version_id)) = not_found {
                return Err(StoreError::VersionNotFound {
                    key: key.as_str().to_string(),
                    version_id: version_id.as_str().to_string(),
                });
            }
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::UnexpectedStatus {
            operation,
            status,
            message,
        })
    }

    fn content_md5(body: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(md5::compute(body).0)
    }

    fn parse_last_modified(raw: &str) -> Result<DateTime<Utc>, StoreError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::Other(format!("invalid LastModified '{}': {}", raw, e)))
    }

    async fn list_page(
        &self,
        prefix: &str,
        key_marker: Option<&str>,
        version_id_marker: Option<&str>,
    ) -> Result<xml::ListVersionsResult, StoreError> {
        let mut query = vec![
            ("versions".to_string(), String::new()),
            ("prefix".to_string(), prefix.to_string()),
        ];
        if let Some(marker) = key_marker {
            query.push(("key-marker".to_string(), marker.to_string()));
        }
        if let Some(marker) = version_id_marker {
            query.push(("version-id-marker".to_string(), marker.to_string()));
        }

        let response = self
            .send(
                Method::GET,
                &self.bucket_path(),
                &query,
                None,
                &[],
                "ListObjectVersions",
            )
            .await?;
        let response = Self::expect_success(response, "ListObjectVersions", None).await?;
        let text = response.text().await?;
        Ok(quick_xml::de::from_str(&text)?)
    }
}

#[async_trait]
impl ObjectVersionStore for S3VersionClient {
    fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    async fn list_object_versions(&self, prefix: &str) -> VersionResult<Vec<ObjectVersionInfo>> {
        let mut versions = Vec::new();
        let mut key_marker: Option<String> = None;
        let mut version_id_marker: Option<String> = None;

        loop {
            let page = self
                .list_page(prefix, key_marker.as_deref(), version_id_marker.as_deref())
                .await?;

            for entry in page.versions {
                let last_modified = Self::parse_last_modified(&entry.last_modified)?;
                let version_id = VersionId::new(entry.version_id)
                    .map_err(|e| StoreError::Other(format!("invalid version id: {}", e)))?;
                versions.push(ObjectVersionInfo {
                    key: entry.key,
                    version_id,
                    last_modified,
                    size: entry.size,
                    is_latest: entry.is_latest,
                });
            }

            if !page.is_truncated {
                break;
            }
            key_marker = page.next_key_marker;
            version_id_marker = page.next_version_id_marker;
            if key_marker.is_none() && version_id_marker.is_none() {
                break;
            }
        }

        Ok(versions)
    }

    async fn get_object_tagging(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<Vec<Tag>> {
        let query = vec![
            ("tagging".to_string(), String::new()),
            ("versionId".to_string(), version_id.as_str().to_string()),
        ];
        let response = self
            .send(
                Method::GET,
                &self.object_path(key),
                &query,
                None,
                &[],
                "GetObjectTagging",
            )
            .await?;
        let response =
            Self::expect_success(response, "GetObjectTagging", Some((key, version_id))).await?;
        let text = response.text().await.map_err(StoreError::Transport)?;
        let document: xml::TaggingDocument =
            quick_xml::de::from_str(&text).map_err(StoreError::MalformedResponse)?;
        Ok(document
            .tag_set
            .tags
            .into_iter()
            .map(|tag| Tag {
                key: tag.key,
                value: tag.value,
            })
            .collect())
    }

    async fn put_object_tagging(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
        tags: Vec<Tag>,
    ) -> VersionResult<()> {
        let document = xml::TaggingDocument {
            tag_set: xml::TagSet {
                tags: tags
                    .into_iter()
                    .map(|tag| xml::TagEntry {
                        key: tag.key,
                        value: tag.value,
                    })
                    .collect(),
            },
        };
        let body = quick_xml::se::to_string(&document)
            .map_err(|e| StoreError::Other(format!("failed to serialize tag set: {}", e)))?;
        let body = Bytes::from(body);
        let headers = vec![("content-md5".to_string(), Self::content_md5(&body))];

        let query = vec![
            ("tagging".to_string(), String::new()),
            ("versionId".to_string(), version_id.as_str().to_string()),
        ];
        let response = self
            .send(
                Method::PUT,
                &self.object_path(key),
                &query,
                Some(body),
                &headers,
                "PutObjectTagging",
            )
            .await?;
        Self::expect_success(response, "PutObjectTagging", Some((key, version_id))).await?;
        Ok(())
    }

    async fn delete_object_version(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<()> {
        let query = vec![("versionId".to_string(), version_id.as_str().to_string())];
        let response = self
            .send(
                Method::DELETE,
                &self.object_path(key),
                &query,
                None,
                &[],
                "DeleteObjectVersion",
            )
            .await?;
        Self::expect_success(response, "DeleteObjectVersion", Some((key, version_id))).await?;
        Ok(())
    }

    async fn copy_version_to_current(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<()> {
        let copy_source = format!(
            "{}?versionId={}",
            sigv4::encode_path(&format!("{}/{}", self.bucket.as_str(), key.as_str())),
            urlencoding::encode(version_id.as_str())
        );
        let headers = vec![("x-amz-copy-source".to_string(), copy_source)];
        let response = self
            .send(
                Method::PUT,
                &self.object_path(key),
                &[],
                None,
                &headers,
                "CopyObjectVersion",
            )
            .await?;
        Self::expect_success(response, "CopyObjectVersion", Some((key, version_id))).await?;
        Ok(())
    }

    async fn get_object_version(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
    ) -> VersionResult<VersionStream> {
        let query = vec![("versionId".to_string(), version_id.as_str().to_string())];
        let response = self
            .send(
                Method::GET,
                &self.object_path(key),
                &query,
                None,
                &[],
                "GetObjectVersion",
            )
            .await?;
        let response =
            Self::expect_success(response, "GetObjectVersion", Some((key, version_id))).await?;

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
            .boxed();
        Ok(Box::new(StreamReader::new(stream)))
    }

    async fn versioning_enabled(&self) -> VersionResult<bool> {
        let query = vec![("versioning".to_string(), String::new())];
        let response = self
            .send(
                Method::GET,
                &self.bucket_path(),
                &query,
                None,
                &[],
                "GetBucketVersioning",
            )
            .await?;
        let response = Self::expect_success(response, "GetBucketVersioning", None).await?;
        let text = response.text().await.map_err(StoreError::Transport)?;
        let config: xml::VersioningConfiguration =
            quick_xml::de::from_str(&text).map_err(StoreError::MalformedResponse)?;
        Ok(config.status.as_deref() == Some("Enabled"))
    }

    async fn enable_versioning(&self) -> VersionResult<()> {
        let body = Bytes::from_static(
            b"<VersioningConfiguration xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
              <Status>Enabled</Status></VersioningConfiguration>",
        );
        let headers = vec![("content-md5".to_string(), Self::content_md5(&body))];
        let query = vec![("versioning".to_string(), String::new())];
        let response = self
            .send(
                Method::PUT,
                &self.bucket_path(),
                &query,
                Some(body),
                &headers,
                "PutBucketVersioning",
            )
            .await?;
        Self::expect_success(response, "PutBucketVersioning", None).await?;
        Ok(())
    }
}
