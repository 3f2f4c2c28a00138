//! Acquisition errors.

use std::io;
use std::time::Duration;

use puper_common::FetchError;
use thiserror::Error;

/// Failure while acquiring a document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading stdin or a file, or reserving a local port, failed.
    #[error("{context}")]
    Io {
        /// What was being done.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An HTTP request failed in transit, or a plain fetch got a non-success
    /// status.
    #[error(transparent)]
    Http(#[from] FetchError),

    /// The WebDriver endpoint answered with a non-success status and no
    /// WebDriver error payload.
    #[error("{url} answered {status}")]
    Status {
        /// The command URL.
        url: String,
        /// The status returned.
        status: reqwest::StatusCode,
    },

    /// The driver process could not be started, or exited early.
    #[error("failed to start {program}")]
    Spawn {
        /// The program that was run.
        program: String,
        /// Why it could not run.
        #[source]
        source: io::Error,
    },

    /// Something did not happen in time.
    #[error("timed out after {after:?} waiting for {what}")]
    Timeout {
        /// What was awaited.
        what: String,
        /// How long was waited.
        after: Duration,
    },

    /// The browser reported a [WebDriver error](https://www.w3.org/TR/webdriver2/#errors).
    #[error("WebDriver error '{error}': {message}")]
    WebDriver {
        /// The error code, e.g. `no such element`.
        error: String,
        /// The browser's explanation.
        message: String,
    },

    /// A WebDriver response body was not the JSON we expected.
    #[error("malformed WebDriver response")]
    Json(#[from] serde_json::Error),
}

impl LoadError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True for the WebDriver error a missing element produces.
    #[must_use]
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, Self::WebDriver { error, .. } if error == "no such element")
    }
}
