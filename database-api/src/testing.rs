//! In-memory stand-ins for a CouchDB server used by the unit tests.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use couchdb_api::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{DocumentClient, JsonObject, Selector, StatusCode, Timestamp};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Order {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    pub customer: String,
    pub total: u32,
    pub placed_at: Timestamp,
}

crate::impl_document!(Order, id, revision);

impl Order {
    pub fn new(customer: &str, total: u32) -> Self {
        Self {
            id: None,
            revision: None,
            customer: customer.to_owned(),
            total,
            placed_at: "2024-03-05T14:07:09.123+01:00".parse().unwrap(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Invoice {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub amount: u64,
}

crate::impl_document!(Invoice, id, rev);

pub fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(object) => object,
        other => panic!("expected an object, got {other}"),
    }
}

fn locked<T, R>(lock: &Mutex<T>, f: impl FnOnce(&mut T) -> R) -> R {
    match lock.lock() {
        Ok(ref mut guard) => f(guard),
        Err(ref mut poisoned) => f(poisoned.get_mut()),
    }
}

fn couch_error(status: StatusCode, error: &str, reason: &str) -> ClientError {
    let body = json!({ "error": error, "reason": reason }).to_string();
    ClientError::from_body(status, body.as_bytes())
}

fn missing_database() -> ClientError {
    couch_error(StatusCode::NOT_FOUND, "not_found", "Database does not exist.")
}

fn conflict() -> ClientError {
    couch_error(StatusCode::CONFLICT, "conflict", "Document update conflict.")
}

struct Stored {
    generation: u64,
    rev: String,
    body: JsonObject,
}

/// Behaves like a single CouchDB node: revision tokens, 404, 409 and 412
/// answers, equality-only selectors.
#[derive(Default)]
pub struct MemoryClient {
    databases: Mutex<HashMap<String, BTreeMap<String, Stored>>>,
}

#[async_trait]
impl DocumentClient for MemoryClient {
    async fn create_database(&self, name: &str) -> Result<JsonObject, ClientError> {
        locked(&self.databases, |databases| {
            if databases.contains_key(name) {
                return Err(couch_error(
                    StatusCode::PRECONDITION_FAILED,
                    "file_exists",
                    "The database could not be created, the file already exists.",
                ));
            }
            databases.insert(name.to_owned(), BTreeMap::new());
            Ok(object(json!({ "ok": true })))
        })
    }

    async fn put_document(
        &self,
        database: &str,
        id: &str,
        revision: Option<&str>,
        body: JsonObject,
    ) -> Result<JsonObject, ClientError> {
        locked(&self.databases, |databases| {
            let docs = databases.get_mut(database).ok_or_else(missing_database)?;
            let generation = match (docs.get(id), revision) {
                (None, None) => 1,
                (Some(current), Some(rev)) if current.rev == rev => current.generation + 1,
                _ => return Err(conflict()),
            };

            let rev = format!("{generation}-{}", Uuid::new_v4().simple());
            let mut body = body;
            body.insert("_id".to_owned(), id.into());
            body.insert("_rev".to_owned(), rev.clone().into());
            docs.insert(
                id.to_owned(),
                Stored {
                    generation,
                    rev: rev.clone(),
                    body,
                },
            );
            Ok(object(json!({ "ok": true, "id": id, "rev": rev })))
        })
    }

    async fn get_document(&self, database: &str, id: &str) -> Result<JsonObject, ClientError> {
        locked(&self.databases, |databases| {
            let docs = databases.get(database).ok_or_else(missing_database)?;
            match docs.get(id) {
                Some(stored) => Ok(stored.body.clone()),
                None => Err(couch_error(StatusCode::NOT_FOUND, "not_found", "missing")),
            }
        })
    }

    async fn find_documents(&self, database: &str, selector: &Selector) -> Result<JsonObject, ClientError> {
        locked(&self.databases, |databases| {
            let docs = databases.get(database).ok_or_else(missing_database)?;
            let matches: Vec<Value> = docs
                .values()
                .filter(|stored| {
                    selector
                        .as_object()
                        .iter()
                        .all(|(field, expected)| stored.body.get(field) == Some(expected))
                })
                .map(|stored| Value::Object(stored.body.clone()))
                .collect();
            Ok(object(json!({ "docs": matches, "bookmark": "nil" })))
        })
    }

    async fn delete_document(&self, database: &str, id: &str, revision: &str) -> Result<JsonObject, ClientError> {
        locked(&self.databases, |databases| {
            let docs = databases.get_mut(database).ok_or_else(missing_database)?;
            let generation = match docs.get(id) {
                None => return Err(couch_error(StatusCode::NOT_FOUND, "not_found", "missing")),
                Some(current) if current.rev != revision => return Err(conflict()),
                Some(current) => current.generation + 1,
            };

            docs.remove(id);
            let rev = format!("{generation}-{}", Uuid::new_v4().simple());
            Ok(object(json!({ "ok": true, "id": id, "rev": rev })))
        })
    }
}

pub enum Reply {
    Object(Value),
    Failure(StatusCode, &'static str),
    UnexpectedJson(StatusCode),
}

/// Answers every request with the same reply and counts the requests.
pub struct ScriptedClient {
    reply: Reply,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn reply(&self) -> Result<JsonObject, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Object(value) => Ok(object(value.clone())),
            Reply::Failure(status, reason) => Err(couch_error(*status, "error", reason)),
            Reply::UnexpectedJson(status) => Err(ClientError::UnexpectedJson {
                status: *status,
                reason: None,
            }),
        }
    }
}

#[async_trait]
impl DocumentClient for ScriptedClient {
    async fn create_database(&self, _name: &str) -> Result<JsonObject, ClientError> {
        self.reply()
    }

    async fn put_document(
        &self,
        _database: &str,
        _id: &str,
        _revision: Option<&str>,
        _body: JsonObject,
    ) -> Result<JsonObject, ClientError> {
        self.reply()
    }

    async fn get_document(&self, _database: &str, _id: &str) -> Result<JsonObject, ClientError> {
        self.reply()
    }

    async fn find_documents(&self, _database: &str, _selector: &Selector) -> Result<JsonObject, ClientError> {
        self.reply()
    }

    async fn delete_document(&self, _database: &str, _id: &str, _revision: &str) -> Result<JsonObject, ClientError> {
        self.reply()
    }
}
