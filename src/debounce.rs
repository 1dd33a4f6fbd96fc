//! Keystroke coalescing for search input.
//!
//! [`crate::filter::FilterStore`] refilters synchronously on every edit,
//! which is already cheap for list-sized data. A consumer that wants to
//! avoid refiltering (or refetching) at keystroke rate can put a
//! [`SearchDebouncer`] between the input source and `set_search_text`:
//! edits buffer until typing settles, and only the latest text is ever
//! delivered. Correctness never depends on it.

use std::time::{Duration, Instant};

/// Buffers rapid search edits until input has settled.
///
/// Poll-driven: the owner calls [`SearchDebouncer::poll`] from its tick
/// loop rather than the debouncer owning a timer.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    settle: Duration,
    pending: Option<String>,
    last_edit: Option<Instant>,
}

impl SearchDebouncer {
    /// Create a debouncer that delivers after `settle` of quiet time.
    ///
    pub fn new(settle: Duration) -> Self {
        SearchDebouncer {
            settle,
            pending: None,
            last_edit: None,
        }
    }

    /// Buffer the latest search text, restarting the settle window.
    ///
    pub fn push(&mut self, text: impl Into<String>) {
        self.pending = Some(text.into());
        self.last_edit = Some(Instant::now());
    }

    /// Whether an edit is buffered and waiting to settle.
    ///
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the buffered text once the settle window has elapsed.
    ///
    /// Returns `None` while input is still arriving (or nothing is
    /// buffered). Intermediate edits are coalesced away; only the latest
    /// text is delivered.
    pub fn poll(&mut self) -> Option<String> {
        let settled = matches!(self.last_edit, Some(at) if at.elapsed() >= self.settle);
        if settled {
            self.take()
        } else {
            None
        }
    }

    /// Take the buffered text immediately, settle window or not.
    ///
    /// For explicit submission, e.g. the user pressing enter.
    pub fn flush(&mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        self.last_edit = None;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const SETTLE: Duration = Duration::from_millis(20);

    #[test]
    fn poll_is_quiet_before_input_settles() {
        let mut debouncer = SearchDebouncer::new(SETTLE);
        debouncer.push("f");
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.poll(), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn poll_delivers_after_the_settle_window() {
        let mut debouncer = SearchDebouncer::new(SETTLE);
        debouncer.push("fr");
        thread::sleep(SETTLE + Duration::from_millis(5));
        assert_eq!(debouncer.poll(), Some("fr".to_owned()));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(), None);
    }

    #[test]
    fn rapid_edits_coalesce_to_the_latest_text() {
        let mut debouncer = SearchDebouncer::new(SETTLE);
        debouncer.push("f");
        debouncer.push("fr");
        debouncer.push("fra");
        thread::sleep(SETTLE + Duration::from_millis(5));
        assert_eq!(debouncer.poll(), Some("fra".to_owned()));
    }

    #[test]
    fn a_new_edit_restarts_the_settle_window() {
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(40));
        debouncer.push("f");
        thread::sleep(Duration::from_millis(25));
        debouncer.push("fr");
        assert_eq!(debouncer.poll(), None);
        thread::sleep(Duration::from_millis(45));
        assert_eq!(debouncer.poll(), Some("fr".to_owned()));
    }

    #[test]
    fn flush_skips_the_settle_window() {
        let mut debouncer = SearchDebouncer::new(SETTLE);
        debouncer.push("france");
        assert_eq!(debouncer.flush(), Some("france".to_owned()));
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn empty_debouncer_delivers_nothing() {
        let mut debouncer = SearchDebouncer::new(SETTLE);
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(), None);
        assert_eq!(debouncer.flush(), None);
    }
}
