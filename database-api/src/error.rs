use std::{error::Error, sync::Arc};

use couchdb_api::{ClientError, StatusCode};
use thiserror::Error;

pub type AsyncError = Arc<dyn Error + Send + Sync>;

/// Every failure the facade reports.
///
/// Cheap to clone so a single injected error can be returned repeatedly.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("document cannot be serialized: {0}")]
    InvalidPayload(String),
    #[error("request failed with code {status}: {reason}")]
    Transport { status: StatusCode, reason: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{0}")]
    CreationFailed(&'static str),
    #[error("failed to decode document: {0}")]
    DecodeFailed(#[source] Arc<serde_json::Error>),
    #[error("unexpected error: {0}")]
    Unexpected(#[source] AsyncError),
}

impl StoreError {
    /// The status a web layer should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::InvalidPayload(_) | StoreError::CreationFailed(_) => StatusCode::BAD_REQUEST,
            // 1xx to 3xx only reach here with an unusable body
            StoreError::Transport { status, .. } if !status.is_client_error() && !status.is_server_error() => {
                StatusCode::BAD_GATEWAY
            }
            StoreError::Transport { status, .. } => *status,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Conflict(_) => StatusCode::CONFLICT,
            StoreError::DecodeFailed(_) => StatusCode::BAD_GATEWAY,
            StoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn from_status(status: StatusCode, reason: String) -> Self {
        if status == StatusCode::NOT_FOUND {
            StoreError::NotFound(reason)
        } else if status == StatusCode::CONFLICT {
            StoreError::Conflict(reason)
        } else {
            StoreError::Transport { status, reason }
        }
    }
}

impl From<ClientError> for StoreError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Http { status, reason } => {
                Self::from_status(status, reason.unwrap_or_else(|| "unknown CouchDB error".to_owned()))
            }
            ClientError::UnexpectedJson { status, reason } => {
                Self::from_status(status, reason.unwrap_or_else(|| "unexpected JSON format".to_owned()))
            }
            other => StoreError::Unexpected(Arc::new(other)),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::DecodeFailed(Arc::new(e))
    }
}
