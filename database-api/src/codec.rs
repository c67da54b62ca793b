//! The boundary between typed documents and the untyped JSON objects the
//! client speaks. Nothing outside this module looks inside a `JsonObject`.

use serde::{de::Error as _, de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{Document, JsonObject, StoreError};

const ID_FIELD: &str = "_id";
const REV_FIELD: &str = "_rev";

/// Body for a put request. Identifier and revision are dropped, they travel in the url.
pub(crate) fn encode<T>(document: &T) -> Result<JsonObject, StoreError>
where
    T: Serialize,
{
    match serde_json::to_value(document) {
        Ok(Value::Object(mut body)) => {
            body.remove(ID_FIELD);
            body.remove(REV_FIELD);
            Ok(body)
        }
        Ok(other) => Err(StoreError::InvalidPayload(format!(
            "expected a json object, got {}",
            kind(&other)
        ))),
        Err(e) => Err(StoreError::InvalidPayload(e.to_string())),
    }
}

pub(crate) fn decode<T>(object: JsonObject) -> Result<T, StoreError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::Object(object))?)
}

/// Decodes the `docs` array of a `_find` response. A missing array means no matches.
pub(crate) fn decode_all<T>(mut response: JsonObject) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
{
    match response.remove("docs") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(docs)) => docs
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect(),
        Some(other) => Err(serde_json::Error::custom(format!(
            "expected docs to be an array, got {}",
            kind(&other)
        ))
        .into()),
    }
}

/// Applies a put acknowledgement (`{"ok": true, "id": ..., "rev": ...}`) to the document.
pub(crate) fn acknowledge<T>(mut document: T, response: &JsonObject, failure: &'static str) -> Result<T, StoreError>
where
    T: Document,
{
    let accepted = match response.get("ok") {
        Some(Value::Bool(ok)) => *ok,
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        _ => false,
    };
    let field = |key: &str| response.get(key).and_then(Value::as_str);

    match (accepted, field("id"), field("rev")) {
        (true, Some(id), Some(rev)) => {
            document.set_identifier(Some(id.to_owned()));
            document.set_revision(Some(rev.to_owned()));
            Ok(document)
        }
        _ => Err(StoreError::CreationFailed(failure)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
