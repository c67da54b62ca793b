use serde::Serialize;
use serde_json::Value;

use crate::JsonObject;

/// Mango selector for `_find`, a map of field name to match criteria.
///
/// The default selector is empty and matches every document.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Selector(JsonObject);

impl Selector {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn builder() -> SelectorBuilder {
        SelectorBuilder(JsonObject::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_object(&self) -> &JsonObject {
        &self.0
    }
}

impl From<JsonObject> for Selector {
    fn from(object: JsonObject) -> Self {
        Self(object)
    }
}

pub struct SelectorBuilder(JsonObject);

impl SelectorBuilder {
    /// Later calls for the same field replace earlier ones.
    pub fn field(mut self, name: &str, criteria: impl Into<Value>) -> Self {
        self.0.insert(name.to_owned(), criteria.into());
        self
    }

    pub fn build(self) -> Selector {
        Selector(self.0)
    }
}

#[macro_export]
macro_rules! selector {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::Selector::builder()
            $(.field($key, $value))*
            .build()
    };
}
