//! Fetch orchestration binding a loadable store to its data source.
//!
//! [`Fetcher`] is the reference consumer loop: open a cycle on the store,
//! invoke the external [`FetchService`], and deliver the outcome. The
//! spawned worker races the service call against the cycle's cancellation
//! token, so a superseded or cancelled cycle abandons its work at the next
//! await point and delivers nothing.

use crate::store::{FetchTicket, LoadableStore};
use anyhow::Result;
use async_trait::async_trait;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Shared handle to a store driven from async tasks.
pub type SharedStore<T> = Arc<Mutex<LoadableStore<T>>>;

/// External collaborator that produces the collection to load.
///
/// Implementations must tolerate abandonment: when the requesting cycle is
/// cancelled the in-progress future is dropped at its next await point and
/// nothing further is expected of it.
#[async_trait]
pub trait FetchService: Send + Sync + 'static {
    /// Element type of the fetched collection.
    type Item: Send + 'static;

    /// Fetch the full collection.
    async fn load(&self) -> Result<Vec<Self::Item>>;
}

/// Drives refresh and retry cycles for one loadable collection.
///
pub struct Fetcher<S: FetchService> {
    store: SharedStore<Vec<S::Item>>,
    service: Arc<S>,
}

impl<S: FetchService> Fetcher<S> {
    /// Create a fetcher driving `store` from `service`.
    ///
    pub fn new(store: SharedStore<Vec<S::Item>>, service: S) -> Self {
        Fetcher {
            store,
            service: Arc::new(service),
        }
    }

    /// The store this fetcher drives.
    ///
    pub fn store(&self) -> SharedStore<Vec<S::Item>> {
        Arc::clone(&self.store)
    }

    /// Open a fetch cycle and spawn its worker, superseding any cycle
    /// already in flight.
    ///
    /// Returns the worker's join handle so callers can await quiescence;
    /// dropping it detaches the worker, which is the normal fire-and-forget
    /// mode.
    pub async fn refresh(&self) -> JoinHandle<()> {
        let ticket = self.store.lock().await.start_fetch();
        let token = ticket.token();
        let store = Arc::clone(&self.store);
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!("Fetch worker stopped by cancellation");
                    return;
                }
                outcome = service.load() => outcome,
            };
            deliver(&store, ticket, outcome).await;
        })
    }

    /// Cancel the in-flight cycle, if any, reverting the store to its last
    /// good value.
    ///
    pub async fn cancel(&self) {
        self.store.lock().await.cancel_fetch();
    }
}

async fn deliver<T: Send>(
    store: &Mutex<LoadableStore<Vec<T>>>,
    ticket: FetchTicket,
    outcome: Result<Vec<T>>,
) {
    let mut store = store.lock().await;
    match outcome {
        Ok(items) => {
            debug!("Fetch worker delivering {} item(s)", items.len());
            store.complete(ticket, items);
        }
        Err(error) => {
            error!("Fetch failed: {:#}", error);
            store.fail(ticket, error);
        }
    }
}
