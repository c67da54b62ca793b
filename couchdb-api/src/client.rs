use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde_json::{json, Value};
use tracing as log;
use url::Url;

use super::{ClientError, CouchConfig, DocumentClient, JsonObject, Selector};

pub struct CouchClient {
    base: Url,
    username: Box<str>,
    password: Box<str>,
    find_limit: u32,
    http: HttpClient,
}

impl CouchClient {
    pub fn new(config: CouchConfig) -> Result<Self, ClientError> {
        if config.url.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint(config.url));
        }

        Ok(Self {
            base: config.url,
            username: config.username,
            password: config.password,
            find_limit: config.find_limit,
            http: HttpClient::new(),
        })
    }

    /// Appends percent-encoded path segments to the base url.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base is rejected in new
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn url_with_revision(&self, segments: &[&str], revision: Option<&str>) -> Url {
        let mut url = self.url(segments);
        if let Some(rev) = revision {
            url.query_pairs_mut().append_pair("rev", rev);
        }
        url
    }

    async fn make_request(&self, method: Method, url: Url, body: Option<Value>) -> Result<JsonObject, ClientError> {
        log::debug!("{} {}", method, url.path());

        let mut request = self.http.request(method, url);
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            parse_object(status, bytes)
        } else {
            log::debug!("Request failed with code {}", status);
            Err(ClientError::from_body(status, &bytes))
        }
    }
}

fn parse_object(status: StatusCode, bytes: Bytes) -> Result<JsonObject, ClientError> {
    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(ClientError::UnexpectedJson {
            status,
            reason: Some(String::from_utf8_lossy(&bytes).into_owned()).filter(|s| !s.is_empty()),
        }),
    }
}

#[async_trait]
impl DocumentClient for CouchClient {
    async fn create_database(&self, name: &str) -> Result<JsonObject, ClientError> {
        self.make_request(Method::PUT, self.url(&[name]), None).await
    }

    async fn put_document(
        &self,
        database: &str,
        id: &str,
        revision: Option<&str>,
        body: JsonObject,
    ) -> Result<JsonObject, ClientError> {
        let url = self.url_with_revision(&[database, id], revision);
        self.make_request(Method::PUT, url, Some(Value::Object(body))).await
    }

    async fn get_document(&self, database: &str, id: &str) -> Result<JsonObject, ClientError> {
        self.make_request(Method::GET, self.url(&[database, id]), None).await
    }

    async fn find_documents(&self, database: &str, selector: &Selector) -> Result<JsonObject, ClientError> {
        let body = json!({
            "selector": selector,
            "limit": self.find_limit,
        });
        self.make_request(Method::POST, self.url(&[database, "_find"]), Some(body)).await
    }

    async fn delete_document(&self, database: &str, id: &str, revision: &str) -> Result<JsonObject, ClientError> {
        let url = self.url_with_revision(&[database, id], Some(revision));
        self.make_request(Method::DELETE, url, None).await
    }
}
