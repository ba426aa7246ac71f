//! In-memory document store.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering},
        Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};
use tokio::sync::{broadcast, broadcast::error::RecvError, mpsc};

use super::{
    subscription::SNAPSHOT_BUFFER,
    traits::{into_fields, resolve_server_timestamps},
    Document, DocumentStore, Query, Subscription,
};
use crate::error::{Error, Result};

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// In-process store with live query support.
///
/// Collections keep insertion order, which is the order queries without an
/// order-by field return. Clones share the same data.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    changes: broadcast::Sender<String>,
    next_id: AtomicU64,
    last_timestamp: AtomicI64,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(HashMap::new()),
                changes,
                next_id: AtomicU64::new(1),
                last_timestamp: AtomicI64::new(0),
                available: AtomicBool::new(true),
            }),
        }
    }

    /// Simulate the backend going away or coming back.
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.inner
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl Inner {
    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<Document>>>> {
        self.collections
            .read()
            .map_err(|_| Error::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<Document>>>> {
        self.collections
            .write()
            .map_err(|_| Error::Internal("memory store lock poisoned".into()))
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::unavailable("memory store is offline"))
        }
    }

    /// Strictly increasing wall-clock milliseconds.
    fn server_now(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last_timestamp.load(Ordering::SeqCst);
        loop {
            let next = now.max(prev + 1);
            match self.last_timestamp.compare_exchange(
                prev,
                next,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    fn next_id(&self) -> String {
        format!("doc{:08}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn run_query(&self, query: &Query) -> Result<Vec<Document>> {
        self.check_available()?;
        let data = self.read()?;
        Ok(data
            .get(&query.collection)
            .map(|docs| query.apply(docs))
            .unwrap_or_default())
    }

    fn notify(&self, collection: &str) {
        // No receivers is fine.
        let _ = self.changes.send(collection.to_owned());
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.inner.check_available()?;
        let data = self.inner.read()?;
        Ok(data
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        self.inner.run_query(query)
    }

    async fn insert(&self, collection: &str, fields: Value) -> Result<String> {
        self.inner.check_available()?;
        let mut fields = into_fields(fields)?;
        resolve_server_timestamps(&mut fields, self.inner.server_now());

        let id = self.inner.next_id();
        {
            let mut data = self.inner.write()?;
            data.entry(collection.to_owned()).or_default().push(Document {
                id: id.clone(),
                fields,
            });
        }
        log::debug!("memory store: inserted {}/{}", collection, id);
        self.inner.notify(collection);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Value, merge: bool) -> Result<()> {
        self.inner.check_available()?;
        let mut fields = into_fields(fields)?;
        resolve_server_timestamps(&mut fields, self.inner.server_now());

        {
            let mut data = self.inner.write()?;
            let docs = data.entry(collection.to_owned()).or_default();
            match docs.iter_mut().find(|d| d.id == id) {
                Some(doc) if merge => doc.fields.extend(fields),
                Some(doc) => doc.fields = fields,
                None => docs.push(Document {
                    id: id.to_owned(),
                    fields,
                }),
            }
        }
        log::debug!("memory store: set {}/{} (merge: {})", collection, id, merge);
        self.inner.notify(collection);
        Ok(())
    }

    async fn watch(&self, query: Query) -> Result<Subscription> {
        let mut changes = self.inner.changes.subscribe();
        let initial = self.inner.run_query(&query)?;
        let inner = self.inner.clone();
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);

        let task = tokio::spawn(async move {
            let mut last = initial.clone();
            if tx.send(Ok(initial)).await.is_err() {
                return;
            }

            loop {
                match changes.recv().await {
                    Ok(collection) if collection != query.collection => continue,
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }

                let snapshot = match inner.run_query(&query) {
                    Ok(docs) if docs == last => continue,
                    Ok(docs) => {
                        last = docs.clone();
                        Ok(docs)
                    }
                    Err(e) => Err(e),
                };
                if tx.send(snapshot).await.is_err() {
                    break;
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::server_timestamp;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_basic_operations() {
        let store = MemoryStore::new();

        let id = store.insert("things", json!({"a": 1})).await.unwrap();
        let doc = store.get("things", &id).await.unwrap().unwrap();
        assert_eq!(doc.get("a"), Some(&json!(1)));

        store.set("things", &id, json!({"b": 2}), true).await.unwrap();
        let doc = store.get("things", &id).await.unwrap().unwrap();
        assert_eq!(doc.get("a"), Some(&json!(1)));
        assert_eq!(doc.get("b"), Some(&json!(2)));

        store.set("things", &id, json!({"c": 3}), false).await.unwrap();
        let doc = store.get("things", &id).await.unwrap().unwrap();
        assert_eq!(doc.get("a"), None);
        assert_eq!(store.count("things"), 1);

        assert!(store.get("things", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_timestamps_increase() {
        let store = MemoryStore::new();
        let a = store.insert("m", json!({"t": server_timestamp()})).await.unwrap();
        let b = store.insert("m", json!({"t": server_timestamp()})).await.unwrap();

        let ta = store.get("m", &a).await.unwrap().unwrap().fields["t"].as_i64().unwrap();
        let tb = store.get("m", &b).await.unwrap().unwrap().fields["t"].as_i64().unwrap();
        assert!(tb > ta);
    }

    #[tokio::test]
    async fn test_offline() {
        let store = MemoryStore::new();
        store.set_available(false);
        let err = store.insert("m", json!({})).await.unwrap_err();
        assert!(err.is_retryable());

        store.set_available(true);
        assert!(store.insert("m", json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn test_watch_delivers_full_snapshots() {
        let store = MemoryStore::new();
        store.insert("m", json!({"n": 2})).await.unwrap();

        let mut sub = store
            .watch(Query::collection("m").order_by("n"))
            .await
            .unwrap();
        assert_eq!(sub.next().await.unwrap().unwrap().len(), 1);

        store.insert("other", json!({"n": 0})).await.unwrap();
        store.insert("m", json!({"n": 1})).await.unwrap();

        let snapshot = sub.next().await.unwrap().unwrap();
        let ns: Vec<_> = snapshot.iter().map(|d| d.fields["n"].clone()).collect();
        assert_eq!(ns, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_watch_cancel() {
        let store = MemoryStore::new();
        let mut sub = store.watch(Query::collection("m")).await.unwrap();
        assert!(sub.next().await.is_some());

        sub.cancel();
        sub.cancel();
        assert!(!sub.is_active());

        store.insert("m", json!({})).await.unwrap();
        let next = tokio::time::timeout(Duration::from_millis(50), sub.next()).await;
        assert!(matches!(next, Ok(None)));
    }
}
