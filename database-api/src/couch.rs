use async_trait::async_trait;
use couchdb_api::ClientError;
use tracing as log;
use uuid::Uuid;

use super::*;

/// [`Database`] backed by a CouchDB server.
pub struct CouchDatabase<C = CouchClient> {
    client: C,
}

impl CouchDatabase {
    /// Builds a facade with its own HTTP client, nothing is sent until the first operation.
    pub fn connect(config: CouchConfig) -> Result<Self, StoreError> {
        Ok(Self::with_client(CouchClient::new(config)?))
    }
}

impl<C> CouchDatabase<C> {
    pub const fn with_client(client: C) -> Self {
        CouchDatabase { client }
    }

    pub const fn client(&self) -> &C {
        &self.client
    }
}

#[async_trait]
impl<C> Database for CouchDatabase<C>
where
    C: DocumentClient,
{
    /// Succeeds when the database already exists.
    async fn create_database(&self, name: &str) -> Result<(), StoreError> {
        match self.client.create_database(name).await {
            Ok(_) => Ok(()),
            Err(ClientError::Http { status, .. }) if status == StatusCode::PRECONDITION_FAILED => {
                log::debug!("Database {name:?} already exists");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn create<T>(&self, document: T, database: &str) -> Result<T, StoreError>
    where
        T: Document,
    {
        let body = codec::encode(&document)?;
        let id = Uuid::new_v4().to_string();
        let response = self.client.put_document(database, &id, None, body).await?;
        codec::acknowledge(document, &response, "Unable to create document")
    }

    async fn get<T>(&self, id: &str, database: &str) -> Result<T, StoreError>
    where
        T: Document,
    {
        let response = self.client.get_document(database, id).await?;
        codec::decode(response)
    }

    async fn get_all<T>(&self, selector: Selector, database: &str) -> Result<Vec<T>, StoreError>
    where
        T: Document,
    {
        let response = self.client.find_documents(database, &selector).await?;
        codec::decode_all(response)
    }

    async fn update<T>(&self, id: &str, revision: &str, document: T, database: &str) -> Result<T, StoreError>
    where
        T: Document,
    {
        let body = codec::encode(&document)?;
        let response = self.client.put_document(database, id, Some(revision), body).await?;
        codec::acknowledge(document, &response, "Unable to update document")
    }

    async fn delete(&self, id: &str, revision: &str, database: &str) -> Result<(), StoreError> {
        self.client.delete_document(database, id, revision).await?;
        Ok(())
    }
}
