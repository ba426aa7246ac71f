//! Live query subscriptions.

use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tokio::{sync::mpsc, task::JoinHandle};

use super::Document;
use crate::error::Result;

/// Buffered snapshots per subscription before the producer waits.
pub(crate) const SNAPSHOT_BUFFER: usize = 16;

/// Handle to a standing live query.
///
/// Every delivery is the complete current result set. Dropping the handle
/// cancels the subscription.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::Receiver<Result<Vec<Document>>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Wrap a snapshot channel and the task feeding it.
    pub fn new(rx: mpsc::Receiver<Result<Vec<Document>>>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Wait for the next snapshot. Returns `None` once cancelled or when the
    /// producer has stopped.
    pub async fn next(&mut self) -> Option<Result<Vec<Document>>> {
        if self.task.is_none() {
            return None;
        }
        self.rx.recv().await
    }

    /// Stop the subscription. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.rx.close();
            log::debug!("subscription cancelled");
        }
    }

    /// Check whether the subscription has not been cancelled.
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A subscription whose snapshots are decoded into `T`.
#[derive(Debug)]
pub struct Watch<T> {
    inner: Subscription,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Watch<T> {
    pub fn new(inner: Subscription) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Wait for the next decoded snapshot.
    pub async fn next(&mut self) -> Option<Result<Vec<T>>> {
        let snapshot = self.inner.next().await?;
        Some(snapshot.and_then(|docs| docs.iter().map(Document::decode).collect()))
    }

    /// Stop the subscription. Safe to call more than once.
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }
}
