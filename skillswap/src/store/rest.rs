//! Document store backed by the hosted JSON document service.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use tokio::{sync::mpsc, time::MissedTickBehavior};

use super::{subscription::SNAPSHOT_BUFFER, Document, DocumentStore, Query, Subscription};
use crate::client::{build_client, AuthState, HttpConfig, HttpExecutor};
use crate::error::{Error, Result};

/// REST client for the document service.
///
/// Live queries are served by polling at `HttpConfig::poll_interval`; a
/// snapshot is delivered only when the result set changed.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: Client,
    config: HttpConfig,
    auth: AuthState,
}

#[derive(Debug, Deserialize)]
struct InsertResponse {
    id: String,
}

impl RestStore {
    /// Create a store for the configured base URL. Requests carry the bearer
    /// token of whoever is signed in on `auth` at the time of the call.
    pub fn new(config: HttpConfig, auth: AuthState) -> Result<Self> {
        let http = build_client(&config)?;
        Ok(Self { http, config, auth })
    }

    fn executor(&self) -> HttpExecutor<'_> {
        let token = self.auth.current().map(|a| a.token);
        HttpExecutor::new(&self.http, &self.config, token)
    }
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let url = self.config.document_url(collection, Some(id))?;
        match self.executor().get_json(url).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        let url = self.config.resolve_url("query")?;
        let body = serde_json::to_value(query)?;
        let value = self.executor().send_json(Method::POST, url, &body).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(value).map_err(Error::Json)
    }

    async fn insert(&self, collection: &str, fields: Value) -> Result<String> {
        let url = self.config.document_url(collection, None)?;
        let value = self.executor().send_json(Method::POST, url, &fields).await?;
        let response: InsertResponse = serde_json::from_value(value)
            .map_err(|e| Error::Malformed(format!("insert response: {}", e)))?;
        Ok(response.id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Value, merge: bool) -> Result<()> {
        let url = self.config.document_url(collection, Some(id))?;
        let method = if merge { Method::PATCH } else { Method::PUT };
        self.executor().send_json(method, url, &fields).await?;
        Ok(())
    }

    async fn watch(&self, query: Query) -> Result<Subscription> {
        let initial = self.query(&query).await?;
        let store = self.clone();
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);

        let task = tokio::spawn(async move {
            let mut last = initial.clone();
            if tx.send(Ok(initial)).await.is_err() {
                return;
            }

            let mut ticker = tokio::time::interval(store.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let snapshot = match store.query(&query).await {
                    Ok(docs) if docs == last => continue,
                    Ok(docs) => {
                        last = docs.clone();
                        Ok(docs)
                    }
                    Err(e) => {
                        log::warn!("polling {} failed: {}", query.collection, e);
                        Err(e)
                    }
                };
                if tx.send(snapshot).await.is_err() {
                    break;
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }
}
