use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

pub use commons::{date, Timestamp};
pub use couchdb_api::{selector, CouchClient, CouchConfig, DocumentClient, JsonObject, Selector, StatusCode};

pub use couch::*;
pub use error::*;
pub use mock::*;

/// Implements [`Document`] for a struct with two `Option<String>` fields holding
/// the identifier and the revision.
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Clone)]
/// struct Order {
///     #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
///     id: Option<String>,
///     #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
///     rev: Option<String>,
///     total: u32,
/// }
///
/// impl_document!(Order, id, rev);
/// ```
#[macro_export]
macro_rules! impl_document {
    ($ty:ty, $id:ident, $rev:ident) => {
        impl $crate::Document for $ty {
            fn identifier(&self) -> Option<&str> {
                self.$id.as_deref()
            }

            fn revision(&self) -> Option<&str> {
                self.$rev.as_deref()
            }

            fn set_identifier(&mut self, id: Option<String>) {
                self.$id = id;
            }

            fn set_revision(&mut self, revision: Option<String>) {
                self.$rev = revision;
            }
        }
    };
}

mod codec;
mod couch;
mod error;
mod mock;
#[cfg(test)]
mod testing;

/// A value stored as a CouchDB document.
///
/// Identifier and revision travel as `_id` and `_rev`. Both are `None` until
/// the document is first created and are overwritten with the server's values
/// after every successful create or update.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn identifier(&self) -> Option<&str>;

    fn revision(&self) -> Option<&str>;

    fn set_identifier(&mut self, id: Option<String>);

    fn set_revision(&mut self, revision: Option<String>);
}

#[async_trait]
pub trait Database: Send + Sync {
    /// Creates the database if it does not exist yet.
    async fn create_database(&self, name: &str) -> Result<(), StoreError>;

    async fn create<T>(&self, document: T, database: &str) -> Result<T, StoreError>
    where
        T: Document;

    async fn get<T>(&self, id: &str, database: &str) -> Result<T, StoreError>
    where
        T: Document;

    /// Documents matching `selector`, in the order the server returned them.
    async fn get_all<T>(&self, selector: Selector, database: &str) -> Result<Vec<T>, StoreError>
    where
        T: Document;

    /// Replaces the document at `revision`, fails with [`StoreError::Conflict`] if that revision is stale.
    async fn update<T>(&self, id: &str, revision: &str, document: T, database: &str) -> Result<T, StoreError>
    where
        T: Document;

    async fn delete(&self, id: &str, revision: &str, database: &str) -> Result<(), StoreError>;
}
