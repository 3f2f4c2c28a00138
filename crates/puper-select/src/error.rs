//! Selector error types.

use thiserror::Error;

/// A selector expression that could not be compiled.
///
/// Carries the whole offending token so the user can find it in a long
/// selector list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector \"{selector}\": {reason}")]
pub struct SelectorSyntaxError {
    /// The selector expression exactly as it was given.
    pub selector: String,
    /// What is wrong with it.
    pub reason: String,
}

impl SelectorSyntaxError {
    /// Create an error for `selector`.
    pub fn new(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}
