//! The lifecycle of a value that must be fetched asynchronously.
//!
//! [`Loadable`] makes every stage of remote data explicit: nothing requested
//! yet, a fetch in flight (optionally still showing the last good value), a
//! loaded value, or a failure. Consumers render directly off the current
//! case instead of juggling `is_loading` flags next to optional data.

use crate::cancel::CancelHandle;
use crate::error::{LoadError, LoadResult};

/// State of an asynchronously fetched value.
///
/// The in-flight case retains the previous value so a refresh keeps showing
/// the last good data until the new result lands or fails. The cancellation
/// handle rides along with the in-flight case; it belongs to exactly one
/// fetch cycle and is retired by whichever transition ends that cycle.
#[derive(Clone, Debug)]
pub enum Loadable<T> {
    /// No fetch has ever been initiated
    NotRequested,
    /// A fetch is running; any previously loaded value stays displayable
    InFlight {
        previous: Option<T>,
        handle: CancelHandle,
    },
    /// The most recent fetch succeeded
    Loaded(T),
    /// The most recent fetch failed; no value is available
    Failed(LoadError),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::NotRequested
    }
}

impl<T> Loadable<T> {
    /// Return the loaded value, or the stale value of an in-flight refresh.
    ///
    pub fn value(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            Loadable::InFlight { previous, .. } => previous.as_ref(),
            _ => None,
        }
    }

    /// Return the failure payload, if the last fetch failed.
    ///
    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Loadable::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Whether no fetch has been initiated yet.
    ///
    pub fn is_not_requested(&self) -> bool {
        matches!(self, Loadable::NotRequested)
    }

    /// Whether a fetch is currently running.
    ///
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Loadable::InFlight { .. })
    }

    /// Whether the most recent fetch succeeded.
    ///
    pub fn is_loaded(&self) -> bool {
        matches!(self, Loadable::Loaded(_))
    }

    /// Whether the most recent fetch failed.
    ///
    pub fn is_failed(&self) -> bool {
        matches!(self, Loadable::Failed(_))
    }

    /// Transform the loaded and stale payloads, preserving the case.
    ///
    /// An in-flight state keeps its cancellation handle, so mapped views
    /// still tear down with the cycle that produced them.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Loadable::NotRequested => Loadable::NotRequested,
            Loadable::InFlight { previous, handle } => Loadable::InFlight {
                previous: previous.map(f),
                handle,
            },
            Loadable::Loaded(value) => Loadable::Loaded(f(value)),
            Loadable::Failed(error) => Loadable::Failed(error),
        }
    }

    /// Consume the state, yielding its value or the reason there is none.
    ///
    /// Follows [`Loadable::value`]: an in-flight stale value counts. A
    /// failure yields its own error; the remaining empty cases yield
    /// [`LoadError::ValueMissing`].
    pub fn into_value(self) -> LoadResult<T> {
        match self {
            Loadable::Loaded(value) => Ok(value),
            Loadable::InFlight {
                previous: Some(value),
                ..
            } => Ok(value),
            Loadable::Failed(error) => Err(error),
            _ => Err(LoadError::ValueMissing),
        }
    }
}

/// Structural equality over the lifecycle. Two in-flight states compare by
/// their stale values only; handle identity never participates.
impl<T: PartialEq> PartialEq for Loadable<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Loadable::NotRequested, Loadable::NotRequested) => true,
            (Loadable::InFlight { previous: a, .. }, Loadable::InFlight { previous: b, .. }) => {
                a == b
            }
            (Loadable::Loaded(a), Loadable::Loaded(b)) => a == b,
            (Loadable::Failed(a), Loadable::Failed(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    #[test]
    fn default_is_not_requested() {
        let state: Loadable<Vec<String>> = Loadable::default();
        assert!(state.is_not_requested());
        assert_eq!(state.value(), None);
    }

    #[test]
    fn value_returns_loaded_payload() {
        let names: Vec<String> = vec![Faker.fake(), Faker.fake()];
        let state = Loadable::Loaded(names.to_owned());
        assert!(state.is_loaded());
        assert_eq!(state.value(), Some(&names));
    }

    #[test]
    fn value_returns_stale_payload_while_in_flight() {
        let names: Vec<String> = vec![Faker.fake()];
        let state = Loadable::InFlight {
            previous: Some(names.to_owned()),
            handle: CancelHandle::new(),
        };
        assert!(state.is_in_flight());
        assert_eq!(state.value(), Some(&names));

        let empty: Loadable<Vec<String>> = Loadable::InFlight {
            previous: None,
            handle: CancelHandle::new(),
        };
        assert_eq!(empty.value(), None);
    }

    #[test]
    fn value_is_empty_after_failure() {
        let state: Loadable<Vec<String>> = Loadable::Failed(LoadError::fetch("network error"));
        assert!(state.is_failed());
        assert_eq!(state.value(), None);
        assert_eq!(state.error(), Some(&LoadError::fetch("network error")));
    }

    #[test]
    fn equality_ignores_handle_identity() {
        let left: Loadable<Vec<&str>> = Loadable::InFlight {
            previous: Some(vec!["Alpha", "Beta"]),
            handle: CancelHandle::new(),
        };
        let right = Loadable::InFlight {
            previous: Some(vec!["Alpha", "Beta"]),
            handle: CancelHandle::new(),
        };
        assert_eq!(left, right);

        let different = Loadable::InFlight {
            previous: None,
            handle: CancelHandle::new(),
        };
        assert_ne!(left, different);
    }

    #[test]
    fn equality_distinguishes_cases() {
        let loaded: Loadable<Vec<&str>> = Loadable::Loaded(vec!["Alpha"]);
        let failed = Loadable::Failed(LoadError::fetch("timeout"));
        assert_ne!(loaded, failed);
        assert_ne!(loaded, Loadable::NotRequested);
        assert_eq!(
            failed,
            Loadable::Failed::<Vec<&str>>(LoadError::fetch("timeout"))
        );
    }

    #[test]
    fn map_preserves_case_and_stale_value() {
        let loaded = Loadable::Loaded(vec!["Alpha", "Beta"]);
        assert_eq!(loaded.map(|names| names.len()), Loadable::Loaded(2));

        let handle = CancelHandle::new();
        let in_flight = Loadable::InFlight {
            previous: Some(vec!["Alpha"]),
            handle: handle.clone(),
        };
        let mapped = in_flight.map(|names| names.len());
        assert_eq!(
            mapped,
            Loadable::InFlight {
                previous: Some(1),
                handle: CancelHandle::new(),
            }
        );

        let failed: Loadable<Vec<&str>> = Loadable::Failed(LoadError::fetch("timeout"));
        assert_eq!(
            failed.map(|names| names.len()),
            Loadable::Failed(LoadError::fetch("timeout"))
        );

        let idle: Loadable<Vec<&str>> = Loadable::NotRequested;
        assert_eq!(idle.map(|names| names.len()), Loadable::NotRequested);
    }

    #[test]
    fn map_keeps_the_cycle_handle() {
        let handle = CancelHandle::new();
        let state = Loadable::InFlight {
            previous: Some(vec!["Alpha"]),
            handle: handle.clone(),
        };
        let mapped = state.map(|names| names.len());
        let token = match &mapped {
            Loadable::InFlight { handle, .. } => handle.token(),
            _ => unreachable!(),
        };
        handle.cancel_all();
        assert!(token.is_cancelled());
    }

    #[test]
    fn into_value_yields_value_or_reason() {
        let loaded = Loadable::Loaded(vec!["Alpha"]);
        assert_eq!(loaded.into_value(), Ok(vec!["Alpha"]));

        let stale = Loadable::InFlight {
            previous: Some(vec!["Alpha"]),
            handle: CancelHandle::new(),
        };
        assert_eq!(stale.into_value(), Ok(vec!["Alpha"]));

        let failed: Loadable<Vec<&str>> = Loadable::Failed(LoadError::fetch("timeout"));
        assert_eq!(failed.into_value(), Err(LoadError::fetch("timeout")));

        let idle: Loadable<Vec<&str>> = Loadable::NotRequested;
        assert_eq!(idle.into_value(), Err(LoadError::ValueMissing));

        let bare: Loadable<Vec<&str>> = Loadable::InFlight {
            previous: None,
            handle: CancelHandle::new(),
        };
        assert_eq!(bare.into_value(), Err(LoadError::ValueMissing));
    }
}
