//! Cancellation primitives for in-flight asynchronous work.
//!
//! A [`CancelHandle`] collects every cancellable unit belonging to one fetch
//! cycle so the whole cycle can be torn down with a single call. Handles are
//! cheap to clone; clones share one registry, which is what lets the state
//! machine keep a handle inside the in-flight case while the worker task
//! holds another.

use log::*;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::sync::CancellationToken;

/// A unit of asynchronous work that can be told to stop.
///
/// Cancellation consumes the registration: each unit is signalled at most
/// once, no matter how many times the owning handle is cancelled.
pub trait Cancellable: Send {
    /// Signal the work to stop producing further effects.
    ///
    fn cancel(self: Box<Self>);
}

impl Cancellable for CancellationToken {
    fn cancel(self: Box<Self>) {
        CancellationToken::cancel(&self);
    }
}

impl Cancellable for AbortHandle {
    fn cancel(self: Box<Self>) {
        self.abort();
    }
}

impl<T: Send> Cancellable for JoinHandle<T> {
    fn cancel(self: Box<Self>) {
        self.abort();
    }
}

struct FnCancel<F: FnOnce() + Send>(F);

impl<F: FnOnce() + Send> Cancellable for FnCancel<F> {
    fn cancel(self: Box<Self>) {
        (self.0)()
    }
}

#[derive(Default)]
struct Registry {
    cancelled: bool,
    entries: Vec<Box<dyn Cancellable>>,
}

/// Shared registry of cancellable work for one fetch cycle.
///
/// Registering after [`CancelHandle::cancel_all`] has run cancels the unit
/// immediately, so a worker that races its own teardown still gets stopped.
#[derive(Clone, Default)]
pub struct CancelHandle {
    inner: Arc<Mutex<Registry>>,
}

impl CancelHandle {
    /// Create an empty handle.
    ///
    pub fn new() -> Self {
        Self::default()
    }

    /// Register cancellable work with this handle.
    ///
    /// If the handle was already cancelled the unit is cancelled on the spot
    /// and nothing is retained.
    pub fn register(&self, cancellable: impl Cancellable + 'static) {
        let mut registry = self.lock();
        if registry.cancelled {
            drop(registry);
            // Signal outside the lock; the unit may re-enter this handle.
            Box::new(cancellable).cancel();
            return;
        }
        registry.entries.push(Box::new(cancellable));
    }

    /// Register a teardown closure.
    ///
    pub fn register_fn(&self, f: impl FnOnce() + Send + 'static) {
        self.register(FnCancel(f));
    }

    /// Mint a cancellation token tied to this handle.
    ///
    /// The token trips when [`CancelHandle::cancel_all`] runs; minted from an
    /// already-cancelled handle it comes back tripped.
    pub fn token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        self.register(token.clone());
        token
    }

    /// Cancel every registered unit exactly once and clear the registry.
    ///
    /// Safe to call repeatedly; later calls are no-ops.
    pub fn cancel_all(&self) {
        let entries = {
            let mut registry = self.lock();
            registry.cancelled = true;
            std::mem::take(&mut registry.entries)
        };
        if !entries.is_empty() {
            debug!("Cancelling {} unit(s) of in-flight work", entries.len());
        }
        for entry in entries {
            entry.cancel();
        }
    }

    /// Whether `cancel_all` has run on this handle (or any clone of it).
    ///
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.lock();
        f.debug_struct("CancelHandle")
            .field("cancelled", &registry.cancelled)
            .field("registered", &registry.entries.len())
            .finish()
    }
}
