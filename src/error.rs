//! Error types for loadable state.
//!
//! This module defines the failure payload carried by the `Failed` case,
//! allowing for type-safe error handling without holding the source error
//! value (which is rarely cloneable or comparable).

/// Failure surfaced by a loadable value.
///
/// The fetch collaborator's error is flattened to a message so the state
/// stays `Clone + PartialEq` and can be asserted on structurally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The external fetch collaborator reported an error
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// A value was requested from a state that holds none
    #[error("No value has been loaded")]
    ValueMissing,
}

impl LoadError {
    /// Build a fetch failure from a message.
    ///
    pub fn fetch(message: impl Into<String>) -> Self {
        LoadError::Fetch(message.into())
    }
}

/// Flattens the full context chain into the message, outermost first.
///
impl From<anyhow::Error> for LoadError {
    fn from(error: anyhow::Error) -> Self {
        LoadError::Fetch(format!("{:#}", error))
    }
}

/// Convenience type alias for Result with LoadError
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_fetch_display() {
        let error = LoadError::fetch("connection reset");
        assert_eq!(error.to_string(), "Fetch failed: connection reset");
    }

    #[test]
    fn test_load_error_value_missing_display() {
        let error = LoadError::ValueMissing;
        assert_eq!(error.to_string(), "No value has been loaded");
    }

    #[test]
    fn test_load_error_from_anyhow_keeps_context_chain() {
        let source = anyhow::anyhow!("connection reset").context("fetching records");
        let error: LoadError = source.into();
        assert!(matches!(error, LoadError::Fetch(_)));
        assert!(error.to_string().contains("fetching records"));
        assert!(error.to_string().contains("connection reset"));
    }

    #[test]
    fn test_load_error_equality() {
        assert_eq!(LoadError::fetch("timeout"), LoadError::fetch("timeout"));
        assert_ne!(LoadError::fetch("timeout"), LoadError::ValueMissing);
    }
}
