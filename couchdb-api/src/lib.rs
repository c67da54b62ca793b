use async_trait::async_trait;

pub use client::*;
pub use config::*;
pub use error::*;
pub use query::*;

pub use reqwest::StatusCode;

mod client;
mod config;
mod error;
#[macro_use]
mod query;
#[cfg(test)]
mod testing;

/// Untyped JSON object, the payload shape of every CouchDB request and response.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// The raw operations of a CouchDB server.
///
/// Bodies and responses are plain JSON objects, typing happens one layer up.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    async fn create_database(&self, name: &str) -> Result<JsonObject, ClientError>;

    /// Creates the document when `revision` is `None`, otherwise replaces that revision.
    async fn put_document(
        &self,
        database: &str,
        id: &str,
        revision: Option<&str>,
        body: JsonObject,
    ) -> Result<JsonObject, ClientError>;

    async fn get_document(&self, database: &str, id: &str) -> Result<JsonObject, ClientError>;

    async fn find_documents(&self, database: &str, selector: &Selector) -> Result<JsonObject, ClientError>;

    async fn delete_document(&self, database: &str, id: &str, revision: &str) -> Result<JsonObject, ClientError>;
}
