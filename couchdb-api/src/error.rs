use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http request failed with code {status}: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Http { status: StatusCode, reason: Option<String> },
    #[error("unexpected json format in response with code {status}")]
    UnexpectedJson { status: StatusCode, reason: Option<String> },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{0} cannot be used as a base url")]
    InvalidEndpoint(Url),
}

impl ClientError {
    /// Builds an `Http` error from an error response, preferring CouchDB's
    /// `reason` field, then `error`, then the raw body.
    pub fn from_body(status: StatusCode, body: &[u8]) -> Self {
        ClientError::Http {
            status,
            reason: reason_from_body(body),
        }
    }
}

fn reason_from_body(body: &[u8]) -> Option<String> {
    if let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) {
        let field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);
        if let Some(reason) = field("reason").or_else(|| field("error")) {
            return Some(reason);
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}
