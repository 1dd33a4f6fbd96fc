//! Loadable state, cancellation, and reactive search filtering for
//! asynchronously fetched data.
//!
//! The crate models remote data as an explicit lifecycle instead of a
//! value-plus-flags tangle. A [`Loadable`] is not requested, in flight,
//! loaded, or failed; the in-flight case keeps the last good value
//! displayable while a refresh runs and carries the [`CancelHandle`] that
//! tears the cycle down. A [`LoadableStore`] owns one such value, numbers
//! its fetch cycles, and guarantees that a superseded or cancelled cycle
//! can never overwrite newer state: delivery requires the move-only
//! [`FetchTicket`] minted when the cycle opened, and tickets from retired
//! cycles are quietly discarded.
//!
//! On top of that, a [`FilterStore`] pairs a loadable collection with a
//! search string and keeps a case-insensitive, order-preserving filtered
//! projection in sync with both, publishing change notifications through a
//! watch channel. [`SearchDebouncer`] optionally coalesces keystroke-rate
//! edits in front of it, and [`Fetcher`] is a ready-made driver that runs a
//! [`FetchService`] against a shared store on the tokio runtime.
//!
//! Consumers are expected to serialize mutations (one logical owner per
//! store, e.g. behind `Arc<tokio::sync::Mutex<_>>`), render purely from the
//! current state and filtered view, and treat retry as a fresh
//! [`LoadableStore::start_fetch`]. Cancellation is never surfaced as a
//! failure.
//!
//! ```
//! use loadable::{FilterStore, LoadableStore};
//!
//! let mut store = LoadableStore::new();
//! let ticket = store.start_fetch();
//! // ... the fetch collaborator produced its collection
//! store.complete(ticket, vec!["France", "Germany", "Finland"]);
//!
//! let mut filter = FilterStore::new();
//! filter.set_all(store.state().clone());
//! filter.set_search_text("fr");
//! assert_eq!(filter.filtered(), ["France"]);
//! ```

pub mod cancel;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod loadable;
pub mod store;

pub use cancel::{CancelHandle, Cancellable};
pub use debounce::SearchDebouncer;
pub use error::{LoadError, LoadResult};
pub use fetch::{FetchService, Fetcher, SharedStore};
pub use filter::{FilterStore, Named};
pub use loadable::Loadable;
pub use store::{FetchTicket, LoadableStore};
