//! Single-owner store driving [`Loadable`] through its fetch lifecycle.
//!
//! Each call to [`LoadableStore::start_fetch`] opens a numbered fetch cycle
//! and hands back a [`FetchTicket`] for it. The ticket is the only way to
//! deliver that cycle's outcome, and it is consumed by delivery, so a cycle
//! can complete at most once. Starting a new cycle (or cancelling) retires
//! the old number; a late delivery carrying a retired ticket is logged and
//! dropped instead of overwriting newer state.
//!
//! The store is written for a single logical owner. Mutations are plain
//! `&mut self` methods; callers that share a store across tasks serialize
//! them behind `Arc<tokio::sync::Mutex<_>>` the way [`crate::fetch::Fetcher`]
//! does.

use crate::cancel::CancelHandle;
use crate::error::LoadError;
use crate::loadable::Loadable;
use log::*;
use tokio::sync::watch;

/// Capability for delivering one fetch cycle's outcome.
///
/// Minted by [`LoadableStore::start_fetch`] and surrendered to
/// [`LoadableStore::complete`] or [`LoadableStore::fail`]. Holding a ticket
/// does not keep the cycle alive: the store may supersede it at any time,
/// after which delivery becomes a no-op.
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
    handle: CancelHandle,
}

impl FetchTicket {
    /// The cancellation handle for this cycle's work.
    ///
    pub fn handle(&self) -> &CancelHandle {
        &self.handle
    }

    /// Mint a cancellation token tied to this cycle.
    ///
    pub fn token(&self) -> tokio_util::sync::CancellationToken {
        self.handle.token()
    }

    /// The cycle number this ticket belongs to.
    ///
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns one [`Loadable`] value and enforces its transition rules.
///
/// Every mutation publishes a revision on a watch channel so observers can
/// re-read the state without the store holding references back to them.
pub struct LoadableStore<T> {
    state: Loadable<T>,
    generation: u64,
    revision: u64,
    notify: watch::Sender<u64>,
}

impl<T> Default for LoadableStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LoadableStore<T> {
    /// Create a store holding `NotRequested`.
    ///
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        LoadableStore {
            state: Loadable::NotRequested,
            generation: 0,
            revision: 0,
            notify,
        }
    }

    /// The current lifecycle state.
    ///
    pub fn state(&self) -> &Loadable<T> {
        &self.state
    }

    /// The loaded value, or the stale value of an in-flight refresh.
    ///
    pub fn value(&self) -> Option<&T> {
        self.state.value()
    }

    /// Subscribe to change notifications.
    ///
    /// The receiver yields a monotonically increasing revision after every
    /// mutation. Notifications may be spurious with respect to the visible
    /// value; observers re-read the state rather than diffing revisions.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Open a new fetch cycle, superseding any cycle already in flight.
    ///
    /// The last good value (loaded, or stale from the superseded cycle) is
    /// carried into the new in-flight state so it stays displayable while
    /// the fetch runs. A superseded cycle's handle is cancelled before the
    /// new one is installed, and its ticket is retired.
    pub fn start_fetch(&mut self) -> FetchTicket {
        let previous = match std::mem::take(&mut self.state) {
            Loadable::Loaded(value) => Some(value),
            Loadable::InFlight { previous, handle } => {
                debug!("Superseding in-flight fetch cycle {}", self.generation);
                handle.cancel_all();
                previous
            }
            Loadable::NotRequested | Loadable::Failed(_) => None,
        };
        self.generation += 1;
        debug!("Starting fetch cycle {}", self.generation);
        let handle = CancelHandle::new();
        self.state = Loadable::InFlight {
            previous,
            handle: handle.clone(),
        };
        self.publish();
        FetchTicket {
            generation: self.generation,
            handle,
        }
    }

    /// Deliver a successful outcome for the ticket's cycle.
    ///
    /// Retired tickets (superseded or cancelled cycles) are discarded with a
    /// log line; the newer state stands.
    pub fn complete(&mut self, ticket: FetchTicket, value: T) {
        if !self.accepts(&ticket, "result") {
            return;
        }
        debug!("Fetch cycle {} completed", ticket.generation);
        ticket.handle.cancel_all();
        self.state = Loadable::Loaded(value);
        self.publish();
    }

    /// Deliver a failure for the ticket's cycle.
    ///
    /// The stale value, if any, is discarded along with the in-flight state;
    /// a retry is a fresh [`LoadableStore::start_fetch`]. Retired tickets
    /// are discarded as in [`LoadableStore::complete`].
    pub fn fail(&mut self, ticket: FetchTicket, error: impl Into<LoadError>) {
        if !self.accepts(&ticket, "failure") {
            return;
        }
        let error = error.into();
        debug!("Fetch cycle {} failed: {}", ticket.generation, error);
        ticket.handle.cancel_all();
        self.state = Loadable::Failed(error);
        self.publish();
    }

    /// Cancel the in-flight cycle and restore the last good value.
    ///
    /// Cancellation is not a failure: the state reverts to `Loaded` with the
    /// stale value when one exists, else to `NotRequested`. The cycle's
    /// ticket is retired, so a worker that misses the cancellation signal
    /// still cannot deliver. No-op when no fetch is in flight.
    pub fn cancel_fetch(&mut self) {
        match std::mem::take(&mut self.state) {
            Loadable::InFlight { previous, handle } => {
                info!("Cancelling fetch cycle {}", self.generation);
                handle.cancel_all();
                self.generation += 1;
                self.state = match previous {
                    Some(value) => Loadable::Loaded(value),
                    None => Loadable::NotRequested,
                };
                self.publish();
            }
            other => self.state = other,
        }
    }

    fn accepts(&self, ticket: &FetchTicket, outcome: &str) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding {} from retired fetch cycle {} (current cycle is {})",
                outcome, ticket.generation, self.generation
            );
            return false;
        }
        if !self.state.is_in_flight() {
            // A current-generation ticket exists only while its cycle is in
            // flight; anything else is a caller contract violation.
            panic!("fetch {} delivered while no fetch is in flight", outcome);
        }
        true
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.notify.send_replace(self.revision);
    }
}
