//! Document store trait definitions.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{Query, Subscription};
use crate::error::{Error, Result};

/// Field key of the server timestamp sentinel.
const SERVER_VALUE_KEY: &str = ".sv";

/// Sentinel value replaced by the store with its own clock at write time.
pub fn server_timestamp() -> Value {
    json!({ ".sv": "timestamp" })
}

/// Check whether a field value is the server timestamp sentinel.
pub fn is_server_timestamp(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|o| o.get(SERVER_VALUE_KEY))
        .and_then(Value::as_str)
        == Some("timestamp")
}

/// Replace top-level sentinel fields with `now`.
pub(crate) fn resolve_server_timestamps(fields: &mut Map<String, Value>, now: i64) {
    for value in fields.values_mut() {
        if is_server_timestamp(value) {
            *value = Value::from(now);
        }
    }
}

/// A stored record: id plus top-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a document. Non-object field values yield an empty document.
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Deserialize into a model. The document id is exposed as field `id`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut fields = self.fields.clone();
        fields.insert("id".into(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| Error::Malformed(format!("document {}: {}", self.id, e)))
    }
}

/// Convert a write payload into a field map.
pub(crate) fn into_fields(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => Err(Error::InvalidArgument(format!(
            "document fields must be an object, got {}",
            other
        ))),
    }
}

/// Trait for document store backends.
///
/// Collections are addressed by slash-separated paths, so a subcollection
/// reads as `Chats/{id}/messages`.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Fetch one document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Fetch every document matching the query.
    async fn query(&self, query: &Query) -> Result<Vec<Document>>;

    /// Insert a new document and return its store-assigned id.
    async fn insert(&self, collection: &str, fields: Value) -> Result<String>;

    /// Write a document by id, replacing it or merging top-level fields.
    async fn set(&self, collection: &str, id: &str, fields: Value, merge: bool) -> Result<()>;

    /// Subscribe to the full result set of a query.
    async fn watch(&self, query: Query) -> Result<Subscription>;
}

/// Extension trait for document stores with typed operations.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Get a document deserialized into `T`.
    async fn get_as<T: DeserializeOwned + Send>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>> {
        match self.get(collection, id).await? {
            Some(doc) => doc.decode().map(Some),
            None => Ok(None),
        }
    }

    /// Run a query and deserialize every result into `T`.
    async fn query_as<T: DeserializeOwned + Send>(&self, query: &Query) -> Result<Vec<T>> {
        self.query(query)
            .await?
            .iter()
            .map(Document::decode)
            .collect()
    }

    /// Insert a serialized value.
    async fn insert_json<T: Serialize + Sync>(&self, collection: &str, value: &T) -> Result<String> {
        let fields = serde_json::to_value(value)?;
        self.insert(collection, fields).await
    }

    /// Set a serialized value.
    async fn set_json<T: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        value: &T,
        merge: bool,
    ) -> Result<()> {
        let fields = serde_json::to_value(value)?;
        self.set(collection, id, fields, merge).await
    }
}

// Blanket implementation
impl<T: DocumentStore + ?Sized> DocumentStoreExt for T {}
