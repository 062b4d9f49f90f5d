use crate::domain::errors::VersionError;
use thiserror::Error as ThisError;

/// Infrastructure errors from the storage adapters
#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(#[from] quick_xml::DeError),

    #[error("version '{version_id}' not found for object: {key}")]
    VersionNotFound { key: String, version_id: String },

    #[error("{operation} returned status {status}: {message}")]
    UnexpectedStatus {
        operation: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Convert infrastructure errors into the domain taxonomy, preserving the
/// cause as text
impl From<StoreError> for VersionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionNotFound { key, version_id } => {
                VersionError::NotFound { key, version_id }
            }
            StoreError::Transport(transport_err) => VersionError::Provider {
                message: format!("http transport error: {}", transport_err),
                source: Some(transport_err.to_string()),
            },
            StoreError::Io(io_err) => VersionError::Provider {
                message: format!("io error: {}", io_err),
                source: Some(io_err.to_string()),
            },
            StoreError::MalformedResponse(xml_err) => VersionError::Provider {
                message: format!("malformed response: {}", xml_err),
                source: Some(xml_err.to_string()),
            },
            StoreError::UnexpectedStatus {
                operation,
                status,
                message,
            } => VersionError::Provider {
                message: format!("{} returned status {}: {}", operation, status, message),
                source: Some(message),
            },
            StoreError::Other(message) => VersionError::Provider {
                message,
                source: None,
            },
        }
    }
}
