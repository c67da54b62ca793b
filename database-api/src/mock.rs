use std::{
    any::{type_name, Any},
    sync::Arc,
};

use async_trait::async_trait;

use super::*;

/// [`Database`] that never touches the network.
///
/// Every operation fails with the injected error if there is one. Otherwise
/// document operations return a clone of the injected result (`get_all` wraps
/// it in a one element vector) and `create_database`/`delete` succeed.
///
/// # Panics
///
/// A document operation panics if neither an error nor a result was injected,
/// or if the result is not of the requested document type.
#[derive(Default, Clone)]
pub struct MockDatabase {
    error: Option<StoreError>,
    result: Option<Arc<dyn Any + Send + Sync>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, error: StoreError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_result<T>(mut self, result: T) -> Self
    where
        T: Document,
    {
        self.result = Some(Arc::new(result));
        self
    }

    pub fn set_error(&mut self, error: Option<StoreError>) {
        self.error = error;
    }

    pub fn set_result<T>(&mut self, result: Option<T>)
    where
        T: Document,
    {
        self.result = result.map(|r| Arc::new(r) as Arc<dyn Any + Send + Sync>);
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn canned<T>(&self) -> Result<T, StoreError>
    where
        T: Document,
    {
        self.check()?;
        let Some(result) = &self.result else {
            panic!("MockDatabase has neither an error nor a result to return");
        };
        match result.downcast_ref::<T>() {
            Some(document) => Ok(document.clone()),
            None => panic!("MockDatabase result is not a {}", type_name::<T>()),
        }
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn create_database(&self, _name: &str) -> Result<(), StoreError> {
        self.check()
    }

    async fn create<T>(&self, _document: T, _database: &str) -> Result<T, StoreError>
    where
        T: Document,
    {
        self.canned()
    }

    async fn get<T>(&self, _id: &str, _database: &str) -> Result<T, StoreError>
    where
        T: Document,
    {
        self.canned()
    }

    async fn get_all<T>(&self, _selector: Selector, _database: &str) -> Result<Vec<T>, StoreError>
    where
        T: Document,
    {
        Ok(vec![self.canned()?])
    }

    async fn update<T>(&self, _id: &str, _revision: &str, _document: T, _database: &str) -> Result<T, StoreError>
    where
        T: Document,
    {
        self.canned()
    }

    async fn delete(&self, _id: &str, _revision: &str, _database: &str) -> Result<(), StoreError> {
        self.check()
    }
}
