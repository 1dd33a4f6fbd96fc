//! Reactive search filtering over loadable collections.
//!
//! [`FilterStore`] pairs a `Loadable<Vec<T>>` with a search string and keeps
//! a filtered projection of the two in sync. Both inputs refilter
//! synchronously on mutation, so a subscriber woken by the change stream
//! always reads a projection consistent with the latest inputs.

use crate::loadable::Loadable;
use tokio::sync::watch;

/// Types that expose a display name for search matching.
///
pub trait Named {
    /// The name the search predicate runs against.
    fn name(&self) -> &str;
}

/// Plain strings match on their own content.
impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

impl Named for &str {
    fn name(&self) -> &str {
        self
    }
}

/// Holds loadable source data plus a search string and derives the filtered
/// view.
///
/// Filtering is a stable linear scan with a case-insensitive substring
/// predicate on each element's [`Named`] projection. Only loaded data is
/// searchable: while the source is in flight or failed the filtered view is
/// empty and consumers render the loadable state itself (stale value,
/// spinner, or error).
pub struct FilterStore<T> {
    all: Loadable<Vec<T>>,
    search_text: String,
    filtered: Vec<T>,
    revision: u64,
    notify: watch::Sender<u64>,
}

impl<T: Named + Clone> Default for FilterStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Named + Clone> FilterStore<T> {
    /// Create a store with no data and an empty search string.
    ///
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        FilterStore {
            all: Loadable::NotRequested,
            search_text: String::new(),
            filtered: vec![],
            revision: 0,
            notify,
        }
    }

    /// The loadable source data.
    ///
    pub fn all(&self) -> &Loadable<Vec<T>> {
        &self.all
    }

    /// The current search string.
    ///
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// The filtered projection of the loaded data.
    ///
    pub fn filtered(&self) -> &[T] {
        &self.filtered
    }

    /// Replace the source data state and refilter.
    ///
    pub fn set_all(&mut self, all: Loadable<Vec<T>>) -> &mut Self {
        self.all = all;
        self.update_filtered();
        self.publish();
        self
    }

    /// Replace the search string and refilter.
    ///
    pub fn set_search_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.search_text = text.into();
        self.update_filtered();
        self.publish();
        self
    }

    /// Subscribe to change notifications.
    ///
    /// Fires after every mutation; a notification does not guarantee the
    /// filtered view actually differs.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    fn update_filtered(&mut self) {
        self.filtered = match &self.all {
            Loadable::Loaded(items) => {
                if self.search_text.is_empty() {
                    items.clone()
                } else {
                    let query_lower = self.search_text.to_lowercase();
                    items
                        .iter()
                        .filter(|item| item.name().to_lowercase().contains(&query_lower))
                        .cloned()
                        .collect()
                }
            }
            _ => vec![],
        };
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.notify.send_replace(self.revision);
    }
}
